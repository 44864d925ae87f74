use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::constants::{MAX_IMAGE_DIMENSION, MAX_PIXEL_COUNT, THUMBNAIL_SIZE};
use crate::error::{ThumbnailError, ThumbnailResult};

// 画像サイズ検証（DoS防止）
pub fn validate_dimensions(width: u32, height: u32) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err("無効な画像サイズ: 幅または高さが0".to_string());
    }
    if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
        return Err(format!(
            "画像サイズが大きすぎます: {}x{} (最大: {})",
            width, height, MAX_IMAGE_DIMENSION
        ));
    }
    let pixel_count = (width as u64) * (height as u64);
    if pixel_count > MAX_PIXEL_COUNT {
        return Err(format!(
            "ピクセル数が多すぎます: {} (最大: {})",
            pixel_count, MAX_PIXEL_COUNT
        ));
    }
    Ok(())
}

// 画像を読み込み、EXIFの向きを補正（アニメーションは先頭フレームのみ）
pub fn load_oriented(path: &Path) -> ThumbnailResult<DynamicImage> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;

    let (width, height) = decoder.dimensions();
    validate_dimensions(width, height).map_err(|detail| ThumbnailError::Tool {
        program: "image".to_string(),
        detail,
    })?;

    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}

// 縦横比を保ったまま THUMBNAIL_SIZE 四方に収める
pub fn create_thumbnail(img: &DynamicImage) -> DynamicImage {
    // Triangle: 高速なリサンプリングフィルタ（サムネイル用途では十分な品質）
    img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
}

// テキストチャンク付きでPNGを書き出す（既存チャンクは引き継がない）
pub fn write_png_with_text(
    path: &Path,
    img: &DynamicImage,
    text: &[(&str, String)],
) -> ThumbnailResult<()> {
    let rgba = img.to_rgba8();
    let mut buffer = Vec::new();

    let mut encoder = png::Encoder::new(&mut buffer, rgba.width(), rgba.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    for (keyword, value) in text {
        encoder.add_text_chunk(keyword.to_string(), value.clone())?;
    }

    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba.as_raw())?;
    writer.finish()?;

    fs::write(path, buffer)?;
    Ok(())
}

/// PNGに埋め込まれたテキスト属性を (キー, 値) で返す。
///
/// tEXt / zTXt / iTXt のいずれも対象。IDAT より後ろのチャンクも読む。
pub fn read_png_text(path: &Path) -> ThumbnailResult<Vec<(String, String)>> {
    let decode_error = |e: png::DecodingError| ThumbnailError::Tool {
        program: "png".to_string(),
        detail: e.to_string(),
    };

    let decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    let mut reader = decoder.read_info().map_err(decode_error)?;
    let mut pixels = vec![0; reader.output_buffer_size()];
    reader.next_frame(&mut pixels).map_err(decode_error)?;
    reader.finish().map_err(decode_error)?;

    let info = reader.info();
    let mut text: Vec<(String, String)> = info
        .uncompressed_latin1_text
        .iter()
        .map(|chunk| (chunk.keyword.clone(), chunk.text.clone()))
        .collect();
    for chunk in &info.compressed_latin1_text {
        text.push((chunk.keyword.clone(), chunk.get_text().map_err(decode_error)?));
    }
    for chunk in &info.utf8_text {
        text.push((chunk.keyword.clone(), chunk.get_text().map_err(decode_error)?));
    }
    Ok(text)
}
