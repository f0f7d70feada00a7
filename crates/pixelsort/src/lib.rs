#![doc = include_str!("../README.md")]

#[doc(inline)]
pub use pixelsort_image as image;

#[doc(inline)]
pub use pixelsort_imgproc as imgproc;

#[doc(inline)]
pub use pixelsort_engine as engine;
