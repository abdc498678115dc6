pub mod code;
pub mod host;
pub mod list;

pub use code::{FriendlyCode, FriendlyCodeFlags, FriendlyCodeStr, ParameterKind, RaceMask, compare_codes};
pub use host::HostVersion;
pub use list::{DefaultPolicy, Filter, FriendlyCodeList, ObjectKind, PackedFriendlyCode, RegistrationKey};
