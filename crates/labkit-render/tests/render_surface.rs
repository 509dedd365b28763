// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use labkit_field::{field_transform, VoltageGrid};
use labkit_render::{FieldRenderer, RenderError, RenderOptions, COLORBAR_LABEL};
use ndarray::Array2;

fn sloped_grid(offset: f64) -> VoltageGrid {
    let cells = Array2::from_shape_fn((6, 6), |(r, c)| offset + 0.5 * r as f64 - 0.25 * c as f64);
    VoltageGrid::from_array(cells).unwrap()
}

fn options_in(dir: &tempfile::TempDir, file: &str) -> RenderOptions {
    RenderOptions {
        output_path: dir.path().join(file),
        ..RenderOptions::default()
    }
}

#[test]
fn test_frame_is_written_with_titles() {
    let dir = tempfile::tempdir().unwrap();
    let options = options_in(&dir, "field.svg");
    let mut renderer = FieldRenderer::new(&options).unwrap();

    assert!(renderer.update(&field_transform(&sloped_grid(1.0))).unwrap());

    let svg = std::fs::read_to_string(&options.output_path).unwrap();
    for text in ["Electric Field", "UNIT VECTOR", "Stream Field", COLORBAR_LABEL] {
        assert!(svg.contains(text), "missing '{text}'");
    }
    assert_eq!(renderer.frames_rendered(), 1);
}

#[test]
fn test_colorbar_created_once_then_updated() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = FieldRenderer::new(&options_in(&dir, "field.svg")).unwrap();
    assert!(renderer.colorbar().is_none());

    renderer.update(&field_transform(&sloped_grid(0.0))).unwrap();
    let first_range = renderer.colorbar().unwrap().range();
    assert_eq!(renderer.colorbar().unwrap().updates(), 0);

    renderer.update(&field_transform(&sloped_grid(10.0))).unwrap();
    let colorbar = renderer.colorbar().unwrap();
    assert_eq!(colorbar.updates(), 1);
    assert!(colorbar.range().0 > first_range.0);
}

#[test]
fn test_flat_grid_renders() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = FieldRenderer::new(&options_in(&dir, "flat.svg")).unwrap();
    assert!(renderer.update(&field_transform(&VoltageGrid::zeros())).unwrap());
}

#[test]
fn test_close_stops_updates() {
    let dir = tempfile::tempdir().unwrap();
    let mut renderer = FieldRenderer::new(&options_in(&dir, "field.svg")).unwrap();
    renderer.close();
    assert!(!renderer.is_open());
    assert!(!renderer.update(&field_transform(&sloped_grid(1.0))).unwrap());
    assert_eq!(renderer.frames_rendered(), 0);
}

#[test]
fn test_deleting_image_closes_surface() {
    let dir = tempfile::tempdir().unwrap();
    let options = options_in(&dir, "field.svg");
    let mut renderer = FieldRenderer::new(&options).unwrap();

    renderer.update(&field_transform(&sloped_grid(1.0))).unwrap();
    assert!(renderer.is_open());

    std::fs::remove_file(&options.output_path).unwrap();
    assert!(!renderer.is_open());
    assert!(!renderer.update(&field_transform(&sloped_grid(2.0))).unwrap());
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = FieldRenderer::new(&options_in(&dir, "field.bmp")).err().unwrap();
    assert!(matches!(err, RenderError::UnsupportedFormat(_)));
}
