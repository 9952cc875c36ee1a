mod change_id;
mod id_macro;

pub use change_id::ChangeId;
