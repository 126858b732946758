//! Text layout: markup, measurement, wrapping, block stacking, plates and shadow copies.

pub(crate) mod blocks;
pub(crate) mod markup;
pub(crate) mod measure;
pub(crate) mod plate;
pub(crate) mod resolved;
pub(crate) mod shadow;
pub(crate) mod wrap;
