// Input checks run on every submitted record before any rendering work starts.

pub mod validation;
