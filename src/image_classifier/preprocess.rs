use crate::image_classifier::tensor::FloatTensor;
use image::{imageops, DynamicImage};

pub const INPUT_SIZE: u32 = 224;

/// ImageNet channel statistics, RGB order.
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

pub fn normalize(value: u8, channel: usize) -> f32 {
    (value as f32 / 255.0 - CHANNEL_MEAN[channel]) / CHANNEL_STD[channel]
}

/// Stretches the image to `size`x`size`, ignoring aspect ratio. The model was trained on
/// stretched inputs, so this must not crop or pad.
pub fn stretch_image(image: &DynamicImage, size: u32) -> DynamicImage {
    if image.width() == 0 || image.height() == 0 {
        return DynamicImage::new_rgb8(size, size);
    }
    image.resize_exact(size, size, imageops::FilterType::Triangle)
}

/// Alpha is dropped, except that a fully transparent pixel has no colour and reads as black.
fn image_to_planar_tensor(image: &DynamicImage) -> FloatTensor {
    let rgba = image.to_rgba8();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    let plane = width * height;
    let mut tensor = FloatTensor::zeros(vec![1, 3, height, width]);

    for (i, pixel) in rgba.pixels().enumerate() {
        let transparent = pixel[3] == 0;
        for c in 0..3 {
            let value = if transparent { 0 } else { pixel[c] };
            tensor.data[c * plane + i] = normalize(value, c);
        }
    }

    tensor
}

/// Converts any decoded image to a `[1, 3, size, size]` channel-planar tensor.
pub fn preprocess_sized(image: &DynamicImage, size: u32) -> FloatTensor {
    let stretched = stretch_image(image, size);
    image_to_planar_tensor(&stretched)
}

pub fn preprocess(image: &DynamicImage) -> FloatTensor {
    preprocess_sized(image, INPUT_SIZE)
}
