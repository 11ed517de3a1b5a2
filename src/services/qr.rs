use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::QrCode;

#[derive(thiserror::Error, Debug)]
pub enum QrRenderError {
    #[error("QR code generation failed: {0}")]
    QrCode(#[from] qrcode::types::QrError),

    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Renders arbitrary text content as a QR code PNG, returned as a
/// `data:image/png;base64,...` URL ready to drop into an `<img>` tag.
pub fn render_data_url(content: &str) -> Result<String, QrRenderError> {
    use image::{ImageBuffer, Luma};

    let code = QrCode::new(content.as_bytes())?;

    // Convert QR code to image buffer
    let module_size = 8u32; // Each module is 8x8 pixels
    let width = code.width() as u32;
    let img_size = width * module_size;

    let mut img = ImageBuffer::<Luma<u8>, Vec<u8>>::new(img_size, img_size);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let module_x = x / module_size;
        let module_y = y / module_size;
        let module_color = code[(module_x as usize, module_y as usize)];
        *pixel = match module_color {
            qrcode::types::Color::Dark => Luma([0u8]),
            qrcode::types::Color::Light => Luma([255u8]),
        };
    }

    // Encode as PNG
    let mut png_data = Vec::new();
    image::DynamicImage::ImageLuma8(img).write_to(
        &mut std::io::Cursor::new(&mut png_data),
        image::ImageFormat::Png,
    )?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png_data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_produces_png_data_url() {
        let url = render_data_url("upi://pay?pa=demo@ybl&am=100.00").unwrap();

        let payload = url
            .strip_prefix("data:image/png;base64,")
            .expect("missing data URL prefix");

        let bytes = STANDARD.decode(payload).expect("invalid base64");
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_render_varies_with_content() {
        let a = render_data_url("upi://pay?pa=a@ybl").unwrap();
        let b = render_data_url("upi://pay?pa=b@ybl").unwrap();

        assert_ne!(a, b);
    }
}
