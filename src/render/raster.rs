//! Pixel-level helpers shared by the transform cache and the software canvas.

use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn texel(img: &RgbaImage, x: i64, y: i64) -> Rgba<u8> {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        TRANSPARENT
    } else {
        *img.get_pixel(x as u32, y as u32)
    }
}

/// Bilinear sample at continuous pixel coordinates, where integer
/// coordinates address texel centers. Outside the image is transparent.
///
/// Colors are weighted by alpha so transparent neighbours do not darken
/// edges.
pub fn sample_bilinear(img: &RgbaImage, x: f32, y: f32) -> Rgba<u8> {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (texel(img, x0, y0), (1.0 - fx) * (1.0 - fy)),
        (texel(img, x0 + 1, y0), fx * (1.0 - fy)),
        (texel(img, x0, y0 + 1), (1.0 - fx) * fy),
        (texel(img, x0 + 1, y0 + 1), fx * fy),
    ];

    let mut rgb = [0.0f32; 3];
    let mut alpha = 0.0f32;
    for (px, w) in taps {
        let a = px[3] as f32 * w;
        alpha += a;
        for (acc, c) in rgb.iter_mut().zip(px.0.iter()) {
            *acc += *c as f32 * a;
        }
    }
    if alpha <= f32::EPSILON {
        return TRANSPARENT;
    }
    Rgba([
        (rgb[0] / alpha).round().clamp(0.0, 255.0) as u8,
        (rgb[1] / alpha).round().clamp(0.0, 255.0) as u8,
        (rgb[2] / alpha).round().clamp(0.0, 255.0) as u8,
        alpha.round().clamp(0.0, 255.0) as u8,
    ])
}

/// Source-over compositing of `src` onto `dst`.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    if sa >= 1.0 {
        *dst = src;
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for i in 0..3 {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        dst[i] = c.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_on_texel_center_is_exact() {
        let img = RgbaImage::from_fn(2, 2, |x, y| Rgba([(x * 100) as u8, (y * 100) as u8, 7, 255]));
        assert_eq!(sample_bilinear(&img, 1.0, 0.0), Rgba([100, 0, 7, 255]));
    }

    #[test]
    fn sample_outside_is_transparent() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        assert_eq!(sample_bilinear(&img, -5.0, 0.0)[3], 0);
    }

    #[test]
    fn half_covered_sample_keeps_color() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 10, 10, 255]));
        let px = sample_bilinear(&img, 0.5, 0.0);
        assert_eq!(&px.0[..3], &[200, 10, 10]);
        assert_eq!(px[3], 128);
    }

    #[test]
    fn blend_opaque_replaces_and_transparent_keeps() {
        let mut dst = Rgba([1, 2, 3, 255]);
        blend_over(&mut dst, Rgba([9, 9, 9, 0]));
        assert_eq!(dst, Rgba([1, 2, 3, 255]));
        blend_over(&mut dst, Rgba([9, 8, 7, 255]));
        assert_eq!(dst, Rgba([9, 8, 7, 255]));
    }
}
