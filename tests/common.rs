//! Test utilities for the inference integration suite.

#![allow(dead_code)]

use anumana_grid::{GridModel, Pose2D};

/// 1x2 corridor: a single beam crossing cell 0 into endpoint cell 1.
pub fn corridor_model() -> GridModel {
    let mut model = GridModel::new(2, 1, 0.1).unwrap();
    model.add_beam(vec![0, 1]).unwrap();
    model
}

/// Small square room scanned from the center in the four cardinal
/// directions; every beam ends just short of the grid edge.
pub fn small_room_model() -> GridModel {
    let mut model = GridModel::from_extent(2.0, 2.0, 0.1).unwrap();
    let range = 0.8;
    for quarter in 0..4 {
        let theta = std::f64::consts::FRAC_PI_2 * quarter as f64;
        model
            .add_laser(&Pose2D::new(0.0, 0.0, theta), range)
            .unwrap();
    }
    model
}
