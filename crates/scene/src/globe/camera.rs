use foundation::math::Vec3;

pub const FOV_Y_DEG: f64 = 50.0;
/// Aspect used until the first resize.
pub const INITIAL_ASPECT: f64 = 1.2;
pub const NEAR: f64 = 180.0;
pub const FAR: f64 = 1800.0;
pub const CAMERA_Z: f64 = 300.0;

pub type Mat4 = [[f32; 4]; 4];

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y_deg: FOV_Y_DEG,
            aspect: INITIAL_ASPECT,
            near: NEAR,
            far: FAR,
            position: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::ZERO,
        }
    }
}

impl PerspectiveCamera {
    pub fn set_aspect(&mut self, aspect: f64) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn projection(&self) -> Mat4 {
        mat4_perspective_rh_z0(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        mat4_look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        mat4_mul(self.projection(), self.view())
    }
}

pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    // Column-major: c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Right-handed perspective with a `[0, 1]` depth range, column-major.
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized();
    let s = f.cross(up).normalized();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, -f.x as f32, 0.0],
        [s.y as f32, u.y as f32, -f.y as f32, 0.0],
        [s.z as f32, u.z as f32, -f.z as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

/// Applies `m` to the point `p` and divides by `w`.
pub fn project_point(m: Mat4, p: Vec3) -> [f64; 3] {
    let mut out = [0.0f64; 4];
    for (row, o) in out.iter_mut().enumerate() {
        *o = f64::from(m[0][row]) * p.x
            + f64::from(m[1][row]) * p.y
            + f64::from(m[2][row]) * p.z
            + f64::from(m[3][row]);
    }
    [out[0] / out[3], out[1] / out[3], out[2] / out[3]]
}
