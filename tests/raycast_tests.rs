//! Raycaster and camera behavior against small hand-built maps.

use ascii_raycaster::camera::{Camera, DEFAULT_PLANE_LEN};
use ascii_raycaster::raycast::{Raycaster, Side, camera_x};
use ascii_raycaster::world::Grid;

/// 5x5 open room with a wall ring.
fn room() -> Grid {
    Grid::from_rows(
        &[
            "#######", "#.....#", "#.....#", "#.....#", "#.....#", "#.....#", "#######",
        ],
        '#',
    )
    .unwrap()
}

fn len(v: [f64; 2]) -> f64 {
    (v[0] * v[0] + v[1] * v[1]).sqrt()
}

#[test]
fn test_center_column_distance_independent_of_width() {
    let grid = room();
    // On the west wall's face, looking east at the wall 5 units away.
    let cam = Camera::looking([1.0, 3.5], [1.0, 0.0], DEFAULT_PLANE_LEN);
    let caster = Raycaster::new(&grid);

    for width in [2, 10, 11, 64, 80, 81] {
        let hit = caster.cast_column(&cam, width / 2, width);
        assert!(
            (hit.distance - 5.0).abs() < 1e-9,
            "width {width}: distance {}",
            hit.distance
        );
        assert_eq!(hit.side, Side::X);
    }
}

#[test]
fn test_axis_aligned_ray_is_finite() {
    let grid = room();
    let cam = Camera::looking([1.0, 3.5], [1.0, 0.0], DEFAULT_PLANE_LEN);
    assert_eq!(cam.dir[1], 0.0);

    let hit = Raycaster::new(&grid).cast(&cam, [1.0, 0.0]);
    assert!(hit.distance.is_finite());
    assert!(!hit.escaped());
    assert!((hit.distance - 5.0).abs() < 1e-9);

    let hit = Raycaster::new(&grid).cast(&cam, [0.0, 1.0]);
    assert!((hit.distance - 2.5).abs() < 1e-9);
    assert_eq!(hit.side, Side::Y);
}

#[test]
fn test_enclosed_room_scenario() {
    let grid = room();
    let cam = Camera::new([3.5, 3.5]);
    let caster = Raycaster::new(&grid);
    let width = 10;

    let hits: Vec<_> = (0..width)
        .map(|x| caster.cast_column(&cam, x, width))
        .collect();
    for (x, hit) in hits.iter().enumerate() {
        assert!(!hit.escaped(), "column {x} escaped");
        assert!(hit.distance.is_finite() && hit.distance > 0.0);
    }

    let center = hits[width / 2].distance;
    let ray_len = |x: usize| hits[x].distance * len(cam.ray_dir(camera_x(x, width)));
    for edge in [0, width - 1] {
        assert!(center <= hits[edge].distance + 1e-9);
        assert!(ray_len(width / 2) < ray_len(edge));
    }
}

#[test]
fn test_flat_wall_has_no_fisheye() {
    let grid = room();
    let cam = Camera::new([3.5, 3.5]);
    let caster = Raycaster::new(&grid);
    for x in 0..10 {
        let hit = caster.cast_column(&cam, x, 10);
        assert!((hit.distance - 2.5).abs() < 1e-9, "column {x}: {}", hit.distance);
        assert_eq!(hit.side, Side::X);
    }
}

#[test]
fn test_move_into_wall_leaves_position_unchanged() {
    let grid = room();
    let mut cam = Camera::looking([1.2, 1.2], [-1.0, -1.0], DEFAULT_PLANE_LEN);
    let before = cam.pos;
    assert!(!cam.try_translate(&grid, true, 0.5));
    assert_eq!(cam.pos, before);

    let mut cam = Camera::looking([1.2, 3.5], [-1.0, 0.0], DEFAULT_PLANE_LEN);
    let before = cam.pos;
    cam.try_translate(&grid, true, 0.5);
    assert_eq!(cam.pos, before);
}

#[test]
fn test_move_commits_only_open_axes() {
    let grid = room();

    // North is blocked, west is open.
    let mut cam = Camera::looking([4.5, 1.2], [-1.0, -1.0], DEFAULT_PLANE_LEN);
    assert!(cam.try_translate(&grid, true, 0.5));
    assert!(cam.pos[0] < 4.5);
    assert_eq!(cam.pos[1], 1.2);

    // Both open.
    let mut cam = Camera::looking([3.5, 3.5], [-1.0, -1.0], DEFAULT_PLANE_LEN);
    assert!(cam.try_translate(&grid, true, 0.5));
    assert!(cam.pos[0] < 3.5 && cam.pos[1] < 3.5);
}

#[test]
fn test_slide_uses_old_coordinates_per_axis() {
    // The diagonal target cell (1,1) is a wall, but each axis on its own is open.
    let grid = Grid::from_rows(&["####", "##.#", "#..#", "####"], '#').unwrap();
    let mut cam = Camera::looking([2.2, 2.2], [-1.0, -1.0], DEFAULT_PLANE_LEN);
    assert!(cam.try_translate(&grid, true, 0.5));
    assert!(grid.is_wall_at(cam.pos[0], cam.pos[1]));
    assert!(cam.pos[0] < 2.0 && cam.pos[1] < 2.0);
}

#[test]
fn test_rotate_round_trip() {
    let mut cam = Camera::new([3.5, 3.5]);
    let before = cam;
    cam.rotate(0.37);
    cam.rotate(-0.37);
    for i in 0..2 {
        assert!((cam.dir[i] - before.dir[i]).abs() < 1e-12);
        assert!((cam.plane[i] - before.plane[i]).abs() < 1e-12);
    }
}
