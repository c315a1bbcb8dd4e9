pub mod ai;
pub mod assets;
pub mod blender;
pub mod ifc;
pub mod inspections;
pub mod mir;
