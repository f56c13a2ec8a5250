//! Text forms of placements.
//!
//! A placement is written as 12 comma-separated numbers: the rows of a 3x4
//! matrix whose first three columns are the rotation and whose last column
//! is the translation applied after it.

use molview_core::{ModelId, Models, MolviewError, Place, Result};

/// Parses 12 comma-separated numbers into a placement.
pub fn parse_place(text: &str) -> Result<Place> {
    let fields: Vec<&str> = text.split(',').collect();
    place_from_fields(&fields)
}

fn place_from_fields(fields: &[&str]) -> Result<Place> {
    if fields.len() != 12 {
        return Err(MolviewError::InvalidPlace(format!(
            "expected 12 comma-separated numbers, got {}",
            fields.len()
        )));
    }
    let mut rows = [0.0; 12];
    for (value, field) in rows.iter_mut().zip(fields) {
        let field = field.trim();
        *value = field
            .parse()
            .map_err(|_| MolviewError::InvalidPlace(format!("'{field}' is not a number")))?;
    }
    Ok(Place::from_rows(rows))
}

/// Parses `#id,n1,...,n12` groups, repeated, into model placements.
///
/// Every model must exist in `models`.
pub fn parse_model_places(text: &str, models: &Models) -> Result<Vec<(ModelId, Place)>> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() % 13 != 0 {
        return Err(MolviewError::InvalidPlace(
            "expected model id and 12 comma-separated numbers".to_string(),
        ));
    }
    fields
        .chunks(13)
        .map(|chunk| {
            let id = parse_model_id(chunk[0])?;
            models.require(id)?;
            Ok((id, place_from_fields(&chunk[1..])?))
        })
        .collect()
}

/// Parses a `#n` model id.
pub fn parse_model_id(text: &str) -> Result<ModelId> {
    let text = text.trim();
    text.strip_prefix('#')
        .and_then(|n| n.parse().ok())
        .map(ModelId)
        .ok_or_else(|| MolviewError::InvalidPlace(format!("'{text}' is not a model id")))
}

/// Formats a placement as 12 numbers with 5 significant digits.
pub fn position_string(place: &Place) -> String {
    place
        .to_rows()
        .iter()
        .map(|&x| format_significant(x))
        .collect::<Vec<_>>()
        .join(",")
}

/// Formats a number with 5 significant digits, like C's `%.5g`.
pub fn format_significant(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let scientific = format!("{x:.4e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if !(-4..5).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exponent.abs())
    } else {
        let decimals = usize::try_from(4 - exponent).unwrap_or(0);
        trim_zeros(&format!("{x:.decimals$}")).to_string()
    }
}

fn trim_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use molview_core::Model;

    #[test]
    fn test_parse_place() {
        let p = parse_place("1,0,0,5, 0,1,0,0, 0,0,1,-2.5").unwrap();
        assert_eq!(p, Place::translation(DVec3::new(5.0, 0.0, -2.5)));
    }

    #[test]
    fn test_parse_place_errors() {
        assert!(matches!(
            parse_place("1,0,0,0,0,1,0,0,0,0,1"),
            Err(MolviewError::InvalidPlace(_))
        ));
        assert!(matches!(
            parse_place("1,0,0,0,0,1,0,0,0,0,1,x"),
            Err(MolviewError::InvalidPlace(msg)) if msg.contains("'x'")
        ));
    }

    #[test]
    fn test_parse_model_places() {
        let mut models = Models::new();
        models.add(Model::new(ModelId(1), "a")).unwrap();
        models.add(Model::new(ModelId(2), "b")).unwrap();

        let places = parse_model_places(
            "#1,1,0,0,5,0,1,0,0,0,0,1,0,#2,1,0,0,0,0,1,0,0,0,0,1,0",
            &models,
        )
        .unwrap();
        assert_eq!(
            places,
            vec![
                (ModelId(1), Place::translation(DVec3::new(5.0, 0.0, 0.0))),
                (ModelId(2), Place::IDENTITY),
            ]
        );

        assert!(matches!(
            parse_model_places("#9,1,0,0,0,0,1,0,0,0,0,1,0", &models),
            Err(MolviewError::ModelNotFound(9))
        ));
        assert!(parse_model_places("#1,1,0,0", &models).is_err());
        assert!(parse_model_places("1,1,0,0,0,0,1,0,0,0,0,1,0", &models).is_err());
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(1.0), "1");
        assert_eq!(format_significant(0.0), "0");
        assert_eq!(format_significant(0.5), "0.5");
        assert_eq!(format_significant(-2.25), "-2.25");
        assert_eq!(format_significant(17.071_067_8), "17.071");
        assert_eq!(format_significant(0.0001), "0.0001");
        assert_eq!(format_significant(0.000_012_34), "1.234e-05");
        assert_eq!(format_significant(123_456.0), "1.2346e+05");
        assert_eq!(format_significant(99_999.0), "99999");
    }

    #[test]
    fn test_position_string() {
        let p = Place::translation(DVec3::new(1.5, 0.0, -3.0));
        assert_eq!(position_string(&p), "1,0,0,1.5,0,1,0,0,0,0,1,-3");
        assert_eq!(parse_place(&position_string(&p)).unwrap(), p);
    }
}
