//! Rolling log of bench readings for the data panel and CSV export.

use std::collections::VecDeque;
use std::fmt::Write as _;

use serde::Serialize;

use crate::core::scene::SceneState;
use crate::optics::measure::measure;

/// Samples kept before the oldest is dropped.
pub const DEFAULT_CAPACITY: usize = 40;

/// Bench pixels per exported centimetre.
const PX_PER_CM: f32 = 10.0;

/// One reading, in bench pixels. Image fields are 0 when no image forms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Seconds since recording started.
    pub time: f32,
    pub object_distance: f32,
    pub object_height: f32,
    pub image_distance: f32,
    pub image_height: f32,
    pub magnification: f32,
    pub focal_length: f32,
}

impl Sample {
    fn same_reading(&self, other: &Sample) -> bool {
        self.object_distance == other.object_distance
            && self.object_height == other.object_height
            && self.image_distance == other.image_distance
            && self.magnification == other.magnification
            && self.focal_length == other.focal_length
    }
}

/// Records a sample whenever the readings change while recording is on.
#[derive(Debug, Clone)]
pub struct MeasurementRecorder {
    samples: VecDeque<Sample>,
    capacity: usize,
    recording: bool,
}

impl MeasurementRecorder {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            recording: false,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Take a reading of `scene` at `time`. Returns true if a sample was added.
    /// Nothing is recorded while paused, with an empty bench, or when the
    /// readings match the previous sample.
    pub fn record(&mut self, scene: &SceneState, time: f32) -> bool {
        if !self.recording {
            return false;
        }
        let Some(m) = measure(scene) else {
            return false;
        };
        let sample = Sample {
            time,
            object_distance: m.object_distance,
            object_height: scene.object.height,
            image_distance: m.image_distance.unwrap_or(0.0),
            image_height: scene.image().map_or(0.0, |i| i.height.abs()),
            magnification: m.magnification.unwrap_or(0.0),
            focal_length: m.focal_length,
        };
        if self.samples.back().is_some_and(|last| last.same_reading(&sample)) {
            return false;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        true
    }

    /// CSV with distances in centimetres, one row per sample.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Time (s),Object Dist (cm),Image Dist (cm),Mag (x),Focal Length (cm)\n");
        for s in &self.samples {
            let _ = writeln!(
                csv,
                "{:.2},{:.2},{:.2},{:.2},{:.2}",
                s.time,
                s.object_distance / PX_PER_CM,
                s.image_distance / PX_PER_CM,
                s.magnification,
                s.focal_length / PX_PER_CM,
            );
        }
        csv
    }
}

impl Default for MeasurementRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
