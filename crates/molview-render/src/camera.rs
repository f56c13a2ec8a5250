//! Camera and view management.
//!
//! The camera position is a [`Place`] whose -z axis is the view direction and
//! whose x and y axes are the horizontal and vertical screen axes. Its
//! [`CameraMode`] expands it into the eye views actually rendered.

use glam::{DMat4, DVec3};
use molview_core::{Bounds, Place};

use crate::camera_mode::CameraMode;
use crate::projection::{frustum, ortho, Projection};
use crate::render_target::RenderTarget;

/// Smallest accepted field of view in degrees.
pub const MIN_FIELD_OF_VIEW: f64 = 1e-3;

/// Largest accepted field of view in degrees.
pub const MAX_FIELD_OF_VIEW: f64 = 180.0 - 1e-3;

/// Smallest accepted orthographic field width.
pub const MIN_FIELD_WIDTH: f64 = 1e-9;

/// A viewpoint into the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera frame in scene coordinates, looking along -z.
    position: Place,
    /// Perspective field of view or orthographic field width.
    projection: Projection,
    /// Mono or stereo rendering.
    mode: CameraMode,
    /// Shift of the view center from the window center, in pixels (used for
    /// supersampling with fractional offsets).
    pixel_shift: (f64, f64),
    /// Set by every change that requires the scene to be redrawn.
    redraw_needed: bool,
}

impl Camera {
    /// Creates a mono perspective camera at the origin with a 45 degree field
    /// of view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Place::IDENTITY,
            projection: Projection::default(),
            mode: CameraMode::Mono,
            pixel_shift: (0.0, 0.0),
            redraw_needed: false,
        }
    }

    /// Creates a perspective camera with the given horizontal field of view.
    #[must_use]
    pub fn with_field_of_view(field_of_view: f64) -> Self {
        let mut camera = Self::new();
        camera.set_field_of_view(field_of_view);
        camera.redraw_needed = false;
        camera
    }

    /// Returns the rendering mode.
    #[must_use]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Sets the rendering mode. The camera frame is unchanged.
    pub fn set_mode(&mut self, mode: CameraMode) {
        self.mode = mode;
        self.redraw_needed = true;
    }

    /// The base camera frame in scene coordinates.
    #[must_use]
    pub fn position(&self) -> Place {
        self.position
    }

    /// Moves the camera.
    pub fn set_position(&mut self, position: Place) {
        self.position = position;
        self.redraw_needed = true;
    }

    /// Camera frame of view `view_num`, or the base frame for `None`.
    #[must_use]
    pub fn get_position(&self, view_num: Option<usize>) -> Place {
        self.mode.view(self.position, view_num)
    }

    /// View direction of a view in scene coordinates.
    #[must_use]
    pub fn view_direction(&self, view_num: Option<usize>) -> DVec3 {
        -self.get_position(view_num).z_axis()
    }

    /// Returns the projection.
    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Sets the projection, clamping its parameter into the valid range.
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = match projection {
            Projection::Perspective { field_of_view } => Projection::Perspective {
                field_of_view: field_of_view.clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW),
            },
            Projection::Orthographic { field_width } => Projection::Orthographic {
                field_width: field_width.max(MIN_FIELD_WIDTH),
            },
        };
        self.redraw_needed = true;
    }

    /// Horizontal field of view in degrees, for perspective cameras.
    #[must_use]
    pub fn field_of_view(&self) -> Option<f64> {
        match self.projection {
            Projection::Perspective { field_of_view } => Some(field_of_view),
            Projection::Orthographic { .. } => None,
        }
    }

    /// Makes the camera perspective with the given field of view in degrees.
    ///
    /// Values are clamped to
    /// [`MIN_FIELD_OF_VIEW`]..=[`MAX_FIELD_OF_VIEW`] so the projection math
    /// never divides by zero.
    pub fn set_field_of_view(&mut self, field_of_view: f64) {
        self.set_projection(Projection::Perspective { field_of_view });
    }

    /// Field width in scene units, for orthographic cameras.
    #[must_use]
    pub fn field_width(&self) -> Option<f64> {
        match self.projection {
            Projection::Orthographic { field_width } => Some(field_width),
            Projection::Perspective { .. } => None,
        }
    }

    /// Makes the camera orthographic with the given field width.
    pub fn set_field_width(&mut self, field_width: f64) {
        self.set_projection(Projection::Orthographic { field_width });
    }

    /// Stereo eye separation in scene units, if in stereo mode.
    #[must_use]
    pub fn eye_separation_scene(&self) -> Option<f64> {
        self.mode.eye_separation_scene()
    }

    /// Sets the stereo eye separation in scene units. Ignored in mono mode.
    pub fn set_eye_separation_scene(&mut self, separation: f64) {
        if let CameraMode::Stereo {
            eye_separation_scene,
            ..
        } = &mut self.mode
        {
            *eye_separation_scene = separation;
            self.redraw_needed = true;
        } else {
            log::debug!("eye separation ignored by mono camera");
        }
    }

    /// Stereo eye separation in pixels, if in stereo mode.
    #[must_use]
    pub fn eye_separation_pixels(&self) -> Option<f64> {
        self.mode.eye_separation_pixels()
    }

    /// Sets the stereo eye separation in pixels. Ignored in mono mode.
    pub fn set_eye_separation_pixels(&mut self, separation: f64) {
        if let CameraMode::Stereo {
            eye_separation_pixels,
            ..
        } = &mut self.mode
        {
            *eye_separation_pixels = separation;
            self.redraw_needed = true;
        } else {
            log::debug!("eye separation ignored by mono camera");
        }
    }

    /// Sub-pixel shift of the view center.
    #[must_use]
    pub fn pixel_shift(&self) -> (f64, f64) {
        self.pixel_shift
    }

    /// Sets the shift of the view center from the window center, in pixels.
    pub fn set_pixel_shift(&mut self, shift: (f64, f64)) {
        self.pixel_shift = shift;
        self.redraw_needed = true;
    }

    /// Whether a change since the last render requires a redraw.
    #[must_use]
    pub fn redraw_needed(&self) -> bool {
        self.redraw_needed
    }

    /// Flags the camera as changed.
    pub fn mark_redraw_needed(&mut self) {
        self.redraw_needed = true;
    }

    /// Reads and clears the redraw flag. Called by the renderer each frame.
    pub fn take_redraw_needed(&mut self) -> bool {
        std::mem::take(&mut self.redraw_needed)
    }

    /// Distance from a sphere's center at which it fills the view.
    fn framing_distance(&self, size: f64) -> f64 {
        match self.projection {
            Projection::Perspective { field_of_view } => {
                let half_tan = (0.5 * field_of_view.to_radians()).tan();
                0.5 * size + 0.5 * size / half_tan
            }
            Projection::Orthographic { .. } => size,
        }
    }

    /// Looks down the scene -z axis at a sphere of diameter `size`, placed so
    /// the sphere just fills the view.
    ///
    /// Orthographic cameras also take `size` as their field width.
    pub fn initialize_view(&mut self, center: DVec3, size: f64) {
        let distance = self.framing_distance(size);
        if self.field_width().is_some() {
            self.set_field_width(size);
        }
        self.set_position(Place::translation(center + DVec3::new(0.0, 0.0, distance)));
    }

    /// Scene shift that moves the camera, without turning it, so a sphere of
    /// diameter `size` at `center` fills the view.
    #[must_use]
    pub fn view_all(&self, center: DVec3, size: f64) -> DVec3 {
        let distance = self.framing_distance(size);
        let vd = self.view_direction(None);
        center - distance * vd - self.position.origin()
    }

    /// Width of the view at the depth of `center`.
    #[must_use]
    pub fn view_width(&self, center: DVec3) -> f64 {
        match self.projection {
            Projection::Perspective { field_of_view } => {
                let depth = (center - self.position.origin()).dot(self.view_direction(None));
                2.0 * depth * (0.5 * field_of_view.to_radians()).tan()
            }
            Projection::Orthographic { field_width } => field_width,
        }
    }

    /// Size of one pixel in scene units at `center`, accounting for
    /// perspective.
    #[must_use]
    pub fn pixel_size(&self, center: DVec3, window_size: (u32, u32)) -> f64 {
        let (width, _) = window_dimensions(window_size);
        match self.projection {
            Projection::Perspective { field_of_view } => {
                let distance = self.position.origin().distance(center);
                distance * 2.0 * (0.5 * field_of_view.to_radians()).tan() / width
            }
            Projection::Orthographic { field_width } => field_width / width,
        }
    }

    /// Projection matrix for rendering view `view_num`.
    ///
    /// The camera's own pixel shift and the mode's per-eye shift are combined
    /// into a frustum shift, so stereo eyes render pre-offset into the same
    /// frame buffer.
    #[must_use]
    pub fn projection_matrix(
        &self,
        near_far_clip: (f64, f64),
        view_num: Option<usize>,
        window_size: (u32, u32),
    ) -> DMat4 {
        let (near, far) = near_far_clip;
        let (ww, wh) = window_dimensions(window_size);
        let aspect = wh / ww;
        let (xps, yps) = self.pixel_shift;
        let (mxs, mys) = self.mode.pixel_shift(view_num);
        let (xshift, yshift) = ((xps + mxs) / ww, (yps + mys) / wh);
        match self.projection {
            Projection::Perspective { field_of_view } => {
                let w = 2.0 * near * (0.5 * field_of_view.to_radians()).tan();
                let h = w * aspect;
                frustum(
                    -0.5 * w,
                    0.5 * w,
                    -0.5 * h,
                    0.5 * h,
                    near,
                    far,
                    xshift,
                    yshift,
                )
            }
            Projection::Orthographic { field_width } => {
                let w = field_width;
                let h = w * aspect;
                ortho(
                    -0.5 * w,
                    0.5 * w,
                    -0.5 * h,
                    0.5 * h,
                    near,
                    far,
                    xshift,
                    yshift,
                )
            }
        }
    }

    /// Scene points under window pixel (`window_x`, `window_y`) at each of
    /// the given distances in front of the camera.
    ///
    /// Window y runs down from the top edge. Uses the first view, so stereo
    /// cameras pick through the left eye.
    #[must_use]
    pub fn clip_plane_points(
        &self,
        window_x: f64,
        window_y: f64,
        window_size: (u32, u32),
        z_distances: &[f64],
    ) -> Vec<DVec3> {
        let (wp, hp) = window_dimensions(window_size);
        // Both offsets are fractions of the window width: the field of view
        // is horizontal.
        let wx = (window_x - 0.5 * wp) / wp;
        let wy = (0.5 * hp - window_y) / wp;
        let eye = self.get_position(Some(0));
        z_distances
            .iter()
            .map(|&z| {
                let width = match self.projection {
                    Projection::Perspective { field_of_view } => {
                        2.0 * z * (0.5 * field_of_view.to_radians()).tan()
                    }
                    Projection::Orthographic { field_width } => field_width,
                };
                eye * DVec3::new(width * wx, width * wy, -z)
            })
            .collect()
    }

    /// Number of views rendered per frame.
    #[must_use]
    pub fn number_of_views(&self) -> usize {
        self.mode.number_of_views()
    }

    /// Directs drawing for view `view_num` to the right buffer.
    pub fn set_render_target(&self, view_num: usize, target: &mut dyn RenderTarget) {
        self.mode.set_render_target(view_num, target);
    }

    /// Combines the rendered views into a single image.
    pub fn combine_rendered_camera_views(&self, target: &mut dyn RenderTarget) {
        self.mode.combine_rendered_camera_views(target);
    }

    /// GPU uniforms for rendering view `view_num`.
    #[must_use]
    pub fn uniforms(
        &self,
        view_num: usize,
        near_far_clip: (f64, f64),
        window_size: (u32, u32),
    ) -> CameraUniforms {
        let eye = self.get_position(Some(view_num));
        let view = eye.inverse().to_mat4();
        let proj = self.projection_matrix(near_far_clip, Some(view_num), window_size);
        CameraUniforms {
            view: view.as_mat4().to_cols_array_2d(),
            proj: proj.as_mat4().to_cols_array_2d(),
            view_proj: (proj * view).as_mat4().to_cols_array_2d(),
            inv_proj: proj.inverse().as_mat4().to_cols_array_2d(),
            camera_pos: eye.origin().as_vec3().to_array(),
            _padding: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Window size in pixels as floats, at least one pixel each way.
fn window_dimensions((width, height): (u32, u32)) -> (f64, f64) {
    (f64::from(width.max(1)), f64::from(height.max(1)))
}

/// Camera uniforms handed to the shaders for one view.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl Default for CameraUniforms {
    fn default() -> Self {
        Self {
            view: glam::Mat4::IDENTITY.to_cols_array_2d(),
            proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            inv_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 0.0],
            _padding: 0.0,
        }
    }
}

/// A camera framing `bounds`, or `None` when there is nothing to frame.
///
/// Used for thumbnails.
#[must_use]
pub fn camera_framing_bounds(bounds: Option<Bounds>, field_of_view: f64) -> Option<Camera> {
    let bounds = bounds?;
    let mut camera = Camera::with_field_of_view(field_of_view);
    camera.initialize_view(bounds.center(), bounds.width());
    Some(camera)
}
