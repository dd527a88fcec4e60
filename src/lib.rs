//! abstrakt generates abstract raster images from randomized shape populations.
//!
//! The public API is session-oriented:
//!
//! - Tune a [`SettingsStore`] (dotted paths, validated ranges, JSON overrides)
//! - Create a [`Studio`] for a [`Canvas`] and call [`Studio::generate`]
//! - Read the result back with [`Studio::raster`] or [`Studio::presented`]
//!
//! Lower-level pieces ([`Generator`], [`CpuRenderer`], [`History`]) are exported for callers that
//! want to drive sampling and drawing themselves.
#![forbid(unsafe_code)]

mod foundation {
    pub mod core;
    pub mod error;
}

mod random {
    pub mod sampling;
}

mod color {
    pub mod hsl;
}

mod settings {
    pub mod snapshot;
    pub mod store;
}

mod scene {
    pub mod generator;
    pub mod grid;
    pub mod model;
}

mod effects {
    pub mod blur_cpu;
    pub mod color_matrix;
    pub mod filter;
}

mod render {
    pub mod cpu;
    pub mod frame;
    pub mod text;
    pub mod wave;
}

mod history {
    pub mod ring;
    pub mod snapshot;
}

mod studio;

pub use crate::foundation::core::{Canvas, Fps};
pub use crate::foundation::error::{AbstraktError, AbstraktResult};

pub use crate::color::hsl::{BaseColor, ColorSample, Hsl, Variation, sample_color};
pub use crate::random::sampling::{
    choice, entropy_rng, from_center, random_float, random_token, seeded_rng, uniform,
};

pub use crate::settings::snapshot::{GeneratorSettings, IntRange};
pub use crate::settings::store::{
    Setting, SettingGroup, SettingKind, SettingValue, SettingsStore,
};

pub use crate::scene::generator::Generator;
pub use crate::scene::model::{
    Background, BlobNode, GridCell, RenderKind, Scene, ShapeDescriptor, Waveform,
};

pub use crate::effects::blur_cpu::blur_frame;
pub use crate::effects::color_matrix::ColorMatrix;
pub use crate::effects::filter::{FILTER_CATALOG, Filter, MAX_BLUR_PX, parse_filter};

pub use crate::render::cpu::{BLOB_ALPHA, CpuRenderer, RenderCache};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::wave::{MIN_WAVE_SIZE, advance_offset, wave_path};

pub use crate::history::ring::{DEFAULT_HISTORY_CAPACITY, EntryId, History, HistoryEntry};
pub use crate::history::snapshot::{SNAPSHOT_SCALE, Snapshot, SnapshotResult, SnapshotWorker};

pub use crate::studio::{Studio, StudioEvent};
