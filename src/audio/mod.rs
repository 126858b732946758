//! Background music: decode, gain, fit to the export length, hand to the recorder.

pub(crate) mod mix;
