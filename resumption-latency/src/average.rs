// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;

/// Fixed-window moving average.
///
/// Once more than `window_size` values have been added, the oldest value is
/// dropped. A window sized to the number of samples therefore yields the plain
/// arithmetic mean of all of them.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: VecDeque<f64>,
    window_size: usize,
}

impl MovingAverage {
    pub fn new(window_size: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    pub fn add(&mut self, value: f64) {
        self.window.push_back(value);
        if self.window.len() > self.window_size {
            self.window.pop_front();
        }
    }

    /// Returns 0 for an empty window.
    pub fn avg(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window.iter().sum::<f64>() / self.window.len() as f64
    }
}
