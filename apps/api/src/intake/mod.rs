// Resume intake: upload → extract → structure → review → save.

pub mod handlers;
pub mod pipeline;
pub mod session;
