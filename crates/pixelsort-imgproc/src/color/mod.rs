mod gray;
mod hsv;
mod rgb;

pub use gray::gray_from_rgb_u8;
pub use hsv::{
    hsv_from_rgb, hsv_from_rgb_u8, hsv_pixel_from_rgb, rgb_from_hsv_u8, rgb_pixel_from_hsv,
};
pub use rgb::{alpha_from_rgba, rgb_from_rgba};
