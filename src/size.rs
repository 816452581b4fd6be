//! Size ceilings for documents and the buffers they are built in.

/// The largest document a caller may build or read without opting into a larger limit.
pub const BSON_OBJ_MAX_USER_SIZE: usize = 16 * 1024 * 1024;

/// The hard ceiling on how large a [`Buffer`](crate::Buffer) may grow, and the size limit
/// applied under [`SizeLimit::Large`].
pub const BUFFER_MAX_SIZE: usize = 64 * 1024 * 1024;

/// The size limit a document is checked against when it is finalized or wrapped.
///
/// ```
/// use bson_builder::{SizeLimit, BSON_OBJ_MAX_USER_SIZE};
///
/// assert_eq!(SizeLimit::default().max_size(), BSON_OBJ_MAX_USER_SIZE);
/// assert!(SizeLimit::Large.max_size() > BSON_OBJ_MAX_USER_SIZE);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizeLimit {
    /// [`BSON_OBJ_MAX_USER_SIZE`].
    #[default]
    Default,

    /// [`BUFFER_MAX_SIZE`], for internal documents that are allowed to exceed the user limit.
    Large,

    /// An explicit ceiling in bytes.
    Custom(usize),
}

impl SizeLimit {
    /// The largest permitted total document length, in bytes.
    pub const fn max_size(self) -> usize {
        match self {
            SizeLimit::Default => BSON_OBJ_MAX_USER_SIZE,
            SizeLimit::Large => BUFFER_MAX_SIZE,
            SizeLimit::Custom(max) => max,
        }
    }

    /// Whether a document of `size` bytes is within this limit.
    pub const fn permits(self, size: usize) -> bool {
        size <= self.max_size()
    }
}
