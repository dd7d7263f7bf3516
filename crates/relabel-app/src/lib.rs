// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod bulk;
pub mod draft;
pub mod ids;
pub mod model;
pub mod protocol;
pub mod state;

pub use bulk::*;
pub use draft::*;
pub use ids::*;
pub use model::*;
pub use protocol::*;
pub use state::*;
