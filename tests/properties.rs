//! Property checks for tile lookup, rotation, and rendering.

use proptest::prelude::*;

use ascii_raycaster::camera::Camera;
use ascii_raycaster::renderer::Renderer;
use ascii_raycaster::world::{Cell, DEFAULT_LEVEL, Grid};

fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

proptest! {
    #[test]
    fn get_tile_is_total(x in -1000i64..1000, y in -1000i64..1000) {
        let grid = Grid::default_level();
        let inside = x >= 0 && y >= 0 && x < grid.width() as i64 && y < grid.height() as i64;
        let expected = if inside {
            match DEFAULT_LEVEL[y as usize].as_bytes()[x as usize] {
                b'#' => Cell::Wall,
                _ => Cell::Open,
            }
        } else {
            Cell::Wall
        };
        prop_assert_eq!(grid.get_tile(x, y), expected);
    }

    #[test]
    fn rotation_round_trip_and_perpendicular(
        theta in -10.0f64..10.0,
        dx in -1.0f64..1.0,
        dy in -1.0f64..1.0,
        plane_len in 0.1f64..2.0,
    ) {
        prop_assume!(dx.abs() + dy.abs() > 0.01);
        let mut cam = Camera::looking([2.5, 2.5], [dx, dy], plane_len);
        let before = cam;

        cam.rotate(theta);
        prop_assert!(dot(cam.dir, cam.plane).abs() < 1e-9);
        cam.rotate(-theta);
        prop_assert!(dot(cam.dir, cam.plane).abs() < 1e-9);

        for i in 0..2 {
            prop_assert!((cam.dir[i] - before.dir[i]).abs() < 1e-9);
            prop_assert!((cam.plane[i] - before.plane[i]).abs() < 1e-9);
        }
        prop_assert_eq!(cam.pos, before.pos);
    }

    #[test]
    fn enclosed_rays_never_escape(
        x in 1.05f64..18.95,
        y in 1.05f64..10.95,
        angle in 0.0f64..std::f64::consts::TAU,
    ) {
        let grid = Grid::default_level();
        prop_assume!(!grid.is_wall_at(x, y));
        let mut cam = Camera::new([x, y]);
        cam.rotate(angle);

        let hits = Renderer::default().cast_columns(&grid, &cam, 40);
        for hit in hits {
            prop_assert!(!hit.escaped());
            prop_assert!(hit.distance > 0.0 && hit.distance < 25.0);
        }
    }

    #[test]
    fn parallel_and_sequential_frames_match(
        x in 1.05f64..18.95,
        y in 1.05f64..10.95,
        angle in 0.0f64..std::f64::consts::TAU,
    ) {
        let grid = Grid::default_level();
        prop_assume!(!grid.is_wall_at(x, y));
        let mut cam = Camera::new([x, y]);
        cam.rotate(angle);

        let parallel = Renderer::default();
        let sequential = Renderer { parallel: false, ..Renderer::default() };
        let a = parallel.render(&grid, &cam, 60, 24);
        prop_assert_eq!(&a, &parallel.render(&grid, &cam, 60, 24));
        prop_assert_eq!(&a, &sequential.render(&grid, &cam, 60, 24));
    }
}
