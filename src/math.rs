use std::ops::Range;

/// Wraps an angle in degrees into [-180, 180).
pub fn angle_modulus(degrees: f64) -> f64 {
    (degrees + 180.).rem_euclid(360.) - 180.
}

/// Softens small stick deflections, `a` = 0 is linear.
pub fn joystick_curve(x: f64, a: f64) -> f64 {
    let sign = if x.is_sign_negative() { -1. } else { 1. };
    let abs_x = x.abs();
    abs_x / (1. + a * (1. - abs_x)) * sign
}

/// Zeroes inputs below `input.start`, then rescales the remaining magnitude
/// from `input` onto `output`, keeping the sign.
pub fn deadzone(value: f64, input: &Range<f64>, output: &Range<f64>) -> f64 {
    let magnitude = value.abs();
    if magnitude < input.start {
        return 0.;
    }

    let t = ((magnitude - input.start) / (input.end - input.start)).clamp(0., 1.);
    let scaled = output.start + t * (output.end - output.start);

    scaled.copysign(value)
}
