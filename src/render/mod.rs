//! CPU frame composition: surfaces, fonts, backgrounds, filters and transitions.

pub(crate) mod background;
pub(crate) mod compositor;
pub(crate) mod filters;
pub(crate) mod fonts;
pub(crate) mod surface;
pub(crate) mod transitions;
