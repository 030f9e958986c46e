use image::{Rgba, RgbaImage};
use kurve_image::{FrameSize, GridPosition, ImageSource, RgbaSource, SequenceRange, SpriteSheet};

#[test]
fn load_png_and_slice_row() {
    // 4 frames of 100x100 per row, 2 rows; the red channel encodes the column
    let pixels = RgbaImage::from_fn(400, 200, |x, y| {
        Rgba([(x / 100) as u8 * 50, (y / 100) as u8 * 50, 0, 255])
    });
    let path = std::env::temp_dir().join(format!("kurve-sheet-{}.png", std::process::id()));
    pixels.save(&path).unwrap();

    let sheet = SpriteSheet::load(RgbaSource, &path);
    std::fs::remove_file(&path).ok();
    let sheet = sheet.unwrap();
    assert_eq!(sheet.dimensions(), (400, 200));

    let size = FrameSize::square(100);
    let walk = sheet.sequence(size, SequenceRange::row(2)).unwrap();
    assert_eq!(walk.len(), 4);
    for (column, frame) in walk.iter().enumerate() {
        assert_eq!(RgbaSource.dimensions(frame), (100, 100));
        assert_eq!(frame.get_pixel(50, 50), &Rgba([column as u8 * 50, 50, 0, 255]));
    }

    let still = sheet.frame(size, GridPosition::new(0, 3)).unwrap();
    assert_eq!(still.get_pixel(99, 99), &Rgba([150, 0, 0, 255]));
}
