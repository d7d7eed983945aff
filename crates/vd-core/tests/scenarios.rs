//! Worked drawing scenarios for a single part.

use approx::assert_relative_eq;
use glam::{DVec2, DVec3};

use vd_core::{
    BoundingVolume, ConnectorTransform, Rect2, SectionKind, Tolerance, build_isometric,
    build_section, compose, resolve_frame, usable_area,
};

#[test]
fn cube_without_connector_gets_world_frame() {
    let bounds = BoundingVolume::new(DVec3::ZERO, DVec3::splat(2.0));
    let frame = resolve_frame(&bounds, None, Tolerance::default()).unwrap();

    assert_eq!(frame.origin, DVec3::ONE);
    assert_relative_eq!(frame.half_extent * 2.0, 12f64.sqrt(), epsilon = 1e-12);
    assert_eq!(frame.basis_x, DVec3::X);
    assert_eq!(frame.basis_y, DVec3::Y);
    assert_eq!(frame.basis_z, DVec3::Z);
}

#[test]
fn identity_connector_points_z_into_part() {
    let bounds = BoundingVolume::new(DVec3::ZERO, DVec3::splat(2.0));
    let connector = ConnectorTransform::new(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z);
    let frame = resolve_frame(&bounds, Some(&connector), Tolerance::default()).unwrap();

    assert_eq!(frame.basis_x, DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(frame.basis_y, DVec3::new(0.0, -1.0, 0.0));
    assert_eq!(frame.basis_z, DVec3::new(0.0, 0.0, -1.0));
    assert_relative_eq!(frame.determinant(), 1.0);
}

#[test]
fn ten_by_eight_sheet_layout() {
    let outline = Rect2::new(DVec2::ZERO, DVec2::new(10.0, 8.0));
    let area = usable_area(&outline);
    assert_relative_eq!(area.min.x, 1.0, epsilon = 1e-12);
    assert_relative_eq!(area.min.y, 1.2, epsilon = 1e-12);
    assert_relative_eq!(area.width(), 9.0, epsilon = 1e-12);
    assert_relative_eq!(area.height(), 6.4, epsilon = 1e-12);

    let bounds = BoundingVolume::new(DVec3::ZERO, DVec3::splat(2.0));
    let frame = resolve_frame(&bounds, None, Tolerance::default()).unwrap();
    let views = vec![
        build_section(&frame, SectionKind::Front, "P1 - Front"),
        build_section(&frame, SectionKind::Right, "P1 - Right"),
        build_section(&frame, SectionKind::Top, "P1 - Top"),
        build_isometric(frame.origin, "P1 - Iso"),
    ];
    let layout = compose(outline, &views).unwrap();

    let expect = |name: &str, x: f64, y: f64| {
        let p = layout.placement(name).unwrap();
        assert_relative_eq!(p.x, x, epsilon = 1e-9);
        assert_relative_eq!(p.y, y, epsilon = 1e-9);
    };
    expect("P1 - Right", 3.25, 6.0);
    expect("P1 - Front", 7.75, 6.0);
    expect("P1 - Top", 3.25, 3.12);
    expect("P1 - Iso", 7.3, 3.12);
}
