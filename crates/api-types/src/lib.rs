//! Wire types shared by the tracker server and its clients.

mod requests;
mod responses;

pub use requests::*;
pub use responses::*;
