//! Per-artifact extraction handlers for macOS evidence.

pub mod audit_listing;
pub mod bluetooth;
pub mod clock;
pub mod dhcp;
pub mod install_history;
pub mod install_log;
pub mod network;
pub mod playlists;
pub mod quarantine;
pub mod timemachine;
pub mod users;

pub use audit_listing::AuditListingExtractor;
pub use bluetooth::BluetoothExtractor;
pub use clock::SystemClockExtractor;
pub use dhcp::DhcpLeasesExtractor;
pub use install_history::InstallHistoryExtractor;
pub use install_log::InstallLogExtractor;
pub use network::NetworkInterfacesExtractor;
pub use playlists::ItunesPlaylistsExtractor;
pub use quarantine::QuarantineExtractor;
pub use timemachine::TimeMachineExtractor;
pub use users::UserAccountsExtractor;
