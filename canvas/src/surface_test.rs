use super::*;

fn count(surface: &PixelSurface, color: Color) -> usize {
    let (w, h) = surface.size();
    (0..h).flat_map(|y| (0..w).map(move |x| (x, y))).filter(|&(x, y)| surface.pixel(x, y) == Some(color)).count()
}

// =============================================================
// PixelSurface
// =============================================================

#[test]
fn new_surface_is_transparent_with_identity_transform() {
    let surface = PixelSurface::new(3, 2);
    assert_eq!(surface.size(), (3, 2));
    assert_eq!(surface.transform(), (1.0, 1.0));
    assert_eq!(count(&surface, Color::TRANSPARENT), 6);
    assert_eq!(surface.pixel(3, 0), None);
}

#[test]
fn fill_covers_pixel_centers_in_half_open_span() {
    let mut surface = PixelSurface::new(10, 10);
    surface.fill_rect(Rect::new(2.0, 3.0, 4.0, 2.0), Color::RED);
    assert_eq!(count(&surface, Color::RED), 8);
    assert_eq!(surface.pixel(2, 3), Some(Color::RED));
    assert_eq!(surface.pixel(5, 4), Some(Color::RED));
    assert_eq!(surface.pixel(6, 4), Some(Color::TRANSPARENT));
    assert_eq!(surface.pixel(2, 5), Some(Color::TRANSPARENT));
}

#[test]
fn fill_is_clipped_to_surface() {
    let mut surface = PixelSurface::new(4, 4);
    surface.fill_rect(Rect::new(-10.0, -10.0, 100.0, 100.0), Color::BLUE);
    assert_eq!(count(&surface, Color::BLUE), 16);
}

#[test]
fn scale_multiplies_and_resize_resets() {
    let mut surface = PixelSurface::new(8, 8);
    surface.scale(2.0, 2.0);
    surface.scale(2.0, 2.0);
    assert_eq!(surface.transform(), (4.0, 4.0));
    surface.resize(8, 8);
    assert_eq!(surface.transform(), (1.0, 1.0));
}

#[test]
fn scaled_fill_covers_device_pixels() {
    let mut surface = PixelSurface::new(8, 8);
    surface.scale(2.0, 2.0);
    surface.fill_rect(Rect::new(1.0, 1.0, 1.0, 1.0), Color::RED);
    assert_eq!(count(&surface, Color::RED), 4);
    assert_eq!(surface.pixel(2, 2), Some(Color::RED));
    assert_eq!(surface.pixel(3, 3), Some(Color::RED));
    assert_eq!(surface.pixel(4, 4), Some(Color::TRANSPARENT));
}

#[test]
fn stroke_rect_draws_outline_without_interior() {
    let mut surface = PixelSurface::new(20, 20);
    surface.stroke_rect(Rect::new(5.0, 5.0, 10.0, 10.0), Color::BLACK, 2.0);
    assert_eq!(surface.pixel(4, 4), Some(Color::BLACK));
    assert_eq!(surface.pixel(15, 15), Some(Color::BLACK));
    assert_eq!(surface.pixel(10, 5), Some(Color::BLACK));
    assert_eq!(surface.pixel(10, 10), Some(Color::TRANSPARENT));
    // 12x12 outer square minus 8x8 hole.
    assert_eq!(count(&surface, Color::BLACK), 144 - 64);
}

#[test]
fn stroke_strips_do_not_overlap() {
    let strips = stroke_strips(Rect::new(0.0, 0.0, 10.0, 10.0), 1.0);
    let area: f64 = strips.iter().map(|r| r.width * r.height).sum();
    assert!((area - (11.0 * 11.0 - 9.0 * 9.0)).abs() < 1e-9);
}

#[test]
fn translucent_fill_blends_over_opaque() {
    let mut surface = PixelSurface::new(1, 1);
    surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
    surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgba(0, 0, 0, 128));
    let px = surface.pixel(0, 0).unwrap();
    assert_eq!(px.a, 255);
    assert!((126..=128).contains(&px.r));
}

#[test]
fn axis_aligned_lines_cover_expected_pixels() {
    let mut surface = PixelSurface::new(20, 20);
    surface.stroke_line(Point::new(5.0, 10.0), Point::new(15.0, 10.0), Color::BLACK, 2.0);
    assert_eq!(count(&surface, Color::BLACK), 20);
    surface.clear();
    surface.stroke_line(Point::new(10.0, 15.0), Point::new(10.0, 5.0), Color::BLACK, 2.0);
    assert_eq!(count(&surface, Color::BLACK), 20);
    assert_eq!(surface.pixel(9, 5), Some(Color::BLACK));
}

#[test]
fn diagonal_line_touches_both_ends() {
    let mut surface = PixelSurface::new(10, 10);
    surface.stroke_line(Point::new(1.0, 1.0), Point::new(8.0, 8.0), Color::BLACK, 2.0);
    assert_eq!(surface.pixel(1, 1), Some(Color::BLACK));
    assert_eq!(surface.pixel(7, 7), Some(Color::BLACK));
    assert_eq!(surface.pixel(8, 1), Some(Color::TRANSPARENT));
}

#[test]
fn clear_resets_pixels_but_keeps_transform() {
    let mut surface = PixelSurface::new(4, 4);
    surface.scale(2.0, 2.0);
    surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::RED);
    surface.clear();
    assert_eq!(count(&surface, Color::TRANSPARENT), 16);
    assert_eq!(surface.transform(), (2.0, 2.0));
}

#[test]
fn ppm_has_header_and_composites_over_white() {
    let mut surface = PixelSurface::new(2, 1);
    surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED);
    let ppm = surface.to_ppm();
    let header = b"P6\n2 1\n255\n";
    assert_eq!(&ppm[..header.len()], header);
    assert_eq!(&ppm[header.len()..], &[255, 0, 0, 255, 255, 255]);
}

// =============================================================
// RecordingSurface
// =============================================================

#[test]
fn recording_surface_logs_calls_in_order() {
    let mut surface = RecordingSurface::new();
    surface.resize(640, 480);
    surface.scale(2.0, 2.0);
    surface.clear();
    surface.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::RED);
    surface.present().unwrap();

    assert_eq!(surface.size(), (640, 480));
    assert_eq!(
        surface.ops(),
        &[
            DrawOp::Resize { width: 640, height: 480 },
            DrawOp::Scale { x: 2.0, y: 2.0 },
            DrawOp::Clear,
            DrawOp::FillRect { rect: Rect::new(1.0, 2.0, 3.0, 4.0), color: Color::RED },
            DrawOp::Present,
        ]
    );
}

#[test]
fn last_frame_starts_at_latest_clear() {
    let mut surface = RecordingSurface::new();
    surface.clear();
    surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::RED);
    surface.clear();
    surface.present().unwrap();
    assert_eq!(surface.last_frame(), &[DrawOp::Clear, DrawOp::Present]);
    assert_eq!(surface.take_ops().len(), 4);
    assert!(surface.ops().is_empty());
    assert!(surface.last_frame().is_empty());
}
