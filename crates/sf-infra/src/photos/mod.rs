mod cache;

pub use cache::CachedPhotoLookup;
