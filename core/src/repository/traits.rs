use crate::error::FetchFailure;

/// Where a raw attendance snapshot is read from.
///
/// Implementations perform exactly one read per call and never cache.
pub trait SnapshotSource {
    fn describe(&self) -> String;
    fn read_snapshot(&self) -> Result<String, FetchFailure>;
}

impl<T: SnapshotSource + ?Sized> SnapshotSource for Box<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read_snapshot(&self) -> Result<String, FetchFailure> {
        (**self).read_snapshot()
    }
}

impl<T: SnapshotSource + ?Sized> SnapshotSource for std::sync::Arc<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read_snapshot(&self) -> Result<String, FetchFailure> {
        (**self).read_snapshot()
    }
}
