//! Domain layer: values and entities describing TFVC state

pub mod entities;
pub mod value_objects;
