//! View commands.
//!
//! Each command validates its input before touching the session, so an
//! error never leaves a half-applied change behind.

use molview_core::{Bounds, ModelId, MolviewError, Place, Result, FAR_PLANE, NEAR_PLANE};
use molview_render::{camera_framing_bounds, Camera};

use crate::args::position_string;
use crate::interpolate::ViewInterpolation;
use crate::named_view::NamedView;
use crate::session::Session;

/// Name that makes [`view_delete`] remove every view.
pub const ALL_VIEWS: &str = "all";

/// Sphere diameter that fills the window with a `pad` fraction left empty.
fn padded_size(bounds: &Bounds, pad: f64) -> f64 {
    bounds.width() / (1.0 - pad.clamp(0.0, 0.99))
}

/// Moves the camera, keeping its orientation, so `bounds` fills the view.
fn frame_bounds(session: &mut Session, bounds: &Bounds, pad: f64) {
    let camera = &mut session.camera;
    let shift = camera.view_all(bounds.center(), padded_size(bounds, pad));
    camera.set_position(Place::translation(shift) * camera.position());
}

/// Frames all displayed models and removes the near and far clip planes.
///
/// The center of rotation moves to the center of the displayed models. Does
/// nothing to the camera when nothing is displayed. Without `pad` the
/// session's [`Options::view_pad`](molview_core::Options::view_pad) is used.
pub fn view_all(session: &mut Session, pad: Option<f64>) {
    let pad = pad.unwrap_or(session.options.view_pad);
    if let Some(bounds) = session.models.all_bounds() {
        frame_bounds(session, &bounds, pad);
        session.center_of_rotation = bounds.center();
    }
    session.clip_planes.remove_plane(NEAR_PLANE);
    session.clip_planes.remove_plane(FAR_PLANE);
}

/// Frames the displayed models among `ids`.
///
/// With `cofr` the center of rotation moves to the center of their bounds.
/// With `clip` near and far planes are placed at the front and back of their
/// bounding sphere; otherwise those planes are removed.
pub fn view_objects(
    session: &mut Session,
    ids: &[ModelId],
    clip: bool,
    cofr: bool,
    pad: Option<f64>,
) -> Result<()> {
    if ids.is_empty() {
        return Err(MolviewError::NoObjectsSpecified);
    }
    for &id in ids {
        session.models.require(id)?;
    }
    let bounds = session
        .models
        .bounds(ids)
        .ok_or(MolviewError::NoDisplayedObjects)?;

    let pad = pad.unwrap_or(session.options.view_pad);
    frame_bounds(session, &bounds, pad);
    let (center, radius) = (bounds.center(), bounds.radius());
    if cofr {
        session.center_of_rotation = center;
    }

    let planes = &mut session.clip_planes;
    if clip {
        let vd = session.camera.view_direction(None);
        planes.set_clip_position(NEAR_PLANE, center - radius * vd, vd);
        planes.set_clip_position(FAR_PLANE, center + radius * vd, vd);
    } else {
        planes.remove_plane(NEAR_PLANE);
        planes.remove_plane(FAR_PLANE);
    }
    Ok(())
}

/// Looks down the scene -z axis, x horizontal and y up, framing all
/// displayed models.
pub fn view_orient(session: &mut Session, pad: Option<f64>) {
    let pad = pad.unwrap_or(session.options.view_pad);
    if let Some(bounds) = session.models.all_bounds() {
        session
            .camera
            .initialize_view(bounds.center(), padded_size(&bounds, pad));
    } else {
        let origin = session.camera.position().origin();
        session.camera.set_position(Place::translation(origin));
    }
    view_all(session, Some(pad));
}

/// Saves the current camera, clip planes and model placements as `name`.
pub fn view_name(session: &mut Session, name: &str) {
    let view = NamedView::capture(session);
    if session.named_views.insert(name, view).is_some() {
        log::debug!("replaced named view '{name}'");
    }
}

/// Deletes a named view, or every view when `name` is `"all"`.
pub fn view_delete(session: &mut Session, name: &str) -> Result<()> {
    if name == ALL_VIEWS {
        session.named_views.clear();
        return Ok(());
    }
    session
        .named_views
        .remove(name)
        .map(|_| ())
        .ok_or_else(|| MolviewError::ViewNotFound(name.to_string()))
}

/// Logs and returns the sorted list of named views.
pub fn view_list(session: &Session) -> String {
    let names = session.named_views.names();
    let message = if names.is_empty() {
        "No named views.".to_string()
    } else {
        format!("Named views: {}", names.join(", "))
    };
    log::info!("{message}");
    message
}

/// Starts a transition from the current state to the named view.
///
/// `frames` defaults to one, which snaps to the view on the first step.
/// The caller steps the returned interpolation once per rendered frame.
pub fn show_view(session: &Session, name: &str, frames: Option<usize>) -> Result<ViewInterpolation> {
    let end = session.named_views.require(name)?.clone();
    let start = NamedView::capture(session);
    Ok(ViewInterpolation::new(
        session,
        start,
        end,
        frames.unwrap_or(1),
    ))
}

/// Resets model placements to the identity: all models, or just `ids`.
pub fn view_initial(session: &mut Session, ids: Option<&[ModelId]>) -> Result<()> {
    let ids = match ids {
        Some(ids) => {
            for &id in ids {
                session.models.require(id)?;
            }
            ids.to_vec()
        }
        None => session.models.ids(),
    };
    for id in ids {
        if let Some(model) = session.models.get_mut(id) {
            model.set_position(Place::IDENTITY);
        }
    }
    session.camera.mark_redraw_needed();
    Ok(())
}

/// Sets camera and model placements directly.
///
/// Placements are taken relative to `coordinate_system` when given, else
/// they are scene (or parent) coordinates. With neither a camera nor model
/// placement the current placements are reported instead.
pub fn view_matrix(
    session: &mut Session,
    camera: Option<Place>,
    models: Option<&[(ModelId, Place)]>,
    coordinate_system: Option<Place>,
) -> Result<Option<String>> {
    if camera.is_none() && models.is_none() {
        return Ok(Some(report_positions(session)));
    }
    if let Some(models) = models {
        for &(id, _) in models {
            session.models.require(id)?;
        }
    }

    let relative = |p: Place| coordinate_system.map_or(p, |csys| csys * p);
    if let Some(place) = camera {
        session.camera.set_position(relative(place));
    }
    for &(id, place) in models.unwrap_or_default() {
        if let Some(model) = session.models.get_mut(id) {
            model.set_position(relative(place));
        }
    }
    session.camera.mark_redraw_needed();
    Ok(None)
}

/// Logs and returns the camera and model placements.
///
/// ```text
/// camera position: r11,r12,r13,t1,r21,...
/// model positions: #1,r11,...,#2,r11,...
/// ```
pub fn report_positions(session: &Session) -> String {
    let mut lines = vec![format!(
        "camera position: {}",
        position_string(&session.camera.position())
    )];
    if !session.models.is_empty() {
        let positions: Vec<String> = session
            .models
            .iter()
            .map(|m| format!("{},{}", m.id(), position_string(&m.position())))
            .collect();
        lines.push(format!("model positions: {}", positions.join(",")));
    }
    let report = lines.join("\n");
    log::info!("{report}");
    report
}

/// Gives `models` the same placement as `same_as`.
///
/// A single `same_as` model is copied to every other model; otherwise the
/// lists must be the same length and are matched pairwise.
pub fn view_position(session: &mut Session, models: &[ModelId], same_as: &[ModelId]) -> Result<()> {
    for &id in models.iter().chain(same_as) {
        session.models.require(id)?;
    }

    let assignments: Vec<(ModelId, Place)> = if let [target] = same_as {
        let place = session.models.require(*target)?.position();
        models
            .iter()
            .filter(|&&id| id != *target)
            .map(|&id| (id, place))
            .collect()
    } else if models.len() == same_as.len() {
        models
            .iter()
            .zip(same_as)
            .map(|(&id, &target)| Ok((id, session.models.require(target)?.position())))
            .collect::<Result<_>>()?
    } else {
        return Err(MolviewError::ModelCountMismatch {
            expected: models.len(),
            actual: same_as.len(),
        });
    };

    for (id, place) in assignments {
        if let Some(model) = session.models.get_mut(id) {
            model.set_position(place);
        }
    }
    session.camera.mark_redraw_needed();
    Ok(())
}

/// A camera framing the given models, or `None` if none are displayed.
pub fn camera_framing_models(session: &Session, ids: &[ModelId]) -> Option<Camera> {
    camera_framing_bounds(session.models.bounds(ids), session.options.field_of_view)
}
