//! The set of extractors a run drives.

use super::extractor::ArtifactExtractor;
use super::macos::{
    AuditListingExtractor, BluetoothExtractor, DhcpLeasesExtractor, InstallHistoryExtractor,
    InstallLogExtractor, ItunesPlaylistsExtractor, NetworkInterfacesExtractor,
    QuarantineExtractor, SystemClockExtractor, TimeMachineExtractor, UserAccountsExtractor,
};
use super::version::SystemVersionExtractor;

/// Every registered extractor, in report order. A full run drives all of
/// these in parallel.
pub fn all_extractors() -> Vec<Box<dyn ArtifactExtractor>> {
    vec![
        Box::new(SystemVersionExtractor),
        Box::new(NetworkInterfacesExtractor),
        Box::new(DhcpLeasesExtractor),
        Box::new(SystemClockExtractor),
        Box::new(UserAccountsExtractor),
        Box::new(ItunesPlaylistsExtractor),
        Box::new(QuarantineExtractor),
        Box::new(TimeMachineExtractor),
        Box::new(BluetoothExtractor),
        Box::new(InstallHistoryExtractor),
        Box::new(InstallLogExtractor),
        Box::new(AuditListingExtractor),
    ]
}

/// The subset and fixed order used by summary mode. Sequential dispatch
/// keeps this order stable in the single summary report.
pub fn summary_extractors() -> Vec<Box<dyn ArtifactExtractor>> {
    vec![
        Box::new(SystemVersionExtractor),
        Box::new(NetworkInterfacesExtractor),
        Box::new(DhcpLeasesExtractor),
        Box::new(SystemClockExtractor),
        Box::new(UserAccountsExtractor),
        Box::new(ItunesPlaylistsExtractor),
        Box::new(TimeMachineExtractor),
        Box::new(BluetoothExtractor),
        Box::new(InstallHistoryExtractor),
    ]
}
