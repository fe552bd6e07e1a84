//! Global constants for the mactriage application.
//!
//! Artifact source paths are relative to the evidence root and fixed at
//! definition time; report names are the filenames extractors append to
//! under the output directory.

// Well-known artifact locations (relative to the evidence root)
/// Plist holding the OS product version and build
pub const SYSTEM_VERSION_PLIST: &str = "System/Library/CoreServices/SystemVersion.plist";

/// Hardware network interface inventory
pub const NETWORK_INTERFACES_PLIST: &str =
    "Library/Preferences/SystemConfiguration/NetworkInterfaces.plist";

/// Directory of per-interface DHCP lease plists
pub const DHCP_LEASES_DIR: &str = "private/var/db/dhcpclient/leases";

/// Automatic timezone preference
pub const TIMEZONE_AUTO_PLIST: &str = "Library/Preferences/com.apple.timezone.auto.plist";

/// NTP configuration used through Sierra
pub const NTP_CONF: &str = "private/etc/ntp.conf";

/// timed daemon state, High Sierra and later
pub const TIMED_PLIST: &str = "private/var/db/timed/Library/Preferences/com.apple.timed.plist";

/// Local account database (one plist per account)
pub const LOCAL_USERS_DIR: &str = "private/var/db/dslocal/nodes/Default/users";

/// Software install receipts
pub const INSTALL_HISTORY_PLIST: &str = "Library/Receipts/InstallHistory.plist";

/// Bluetooth daemon preferences (pairing records)
pub const BLUETOOTH_PLIST: &str = "Library/Preferences/com.apple.Bluetooth.plist";

/// Time Machine configuration
pub const TIME_MACHINE_PLIST: &str = "Library/Preferences/com.apple.TimeMachine.plist";

/// User home directories
pub const USER_HOMES_DIR: &str = "Users";

/// iTunes library, relative to a user home (removed in Catalina)
pub const ITUNES_LIBRARY_XML: &str = "Music/iTunes/iTunes Music Library.xml";

/// Quarantine event database, relative to a user home
pub const QUARANTINE_DB: &str =
    "Library/Preferences/com.apple.LaunchServices.QuarantineEventsV2";

/// Installer log (current; rotated siblings are gzipped)
pub const INSTALL_LOG: &str = "private/var/log/install.log";

/// BSM audit trail directory
pub const AUDIT_LOG_DIR: &str = "private/var/audit";

// Report filenames
/// OS version, clock, installs, Bluetooth, Time Machine
pub const REPORT_SYSTEM: &str = "System.txt";

/// Network interfaces and DHCP leases
pub const REPORT_NETWORKING: &str = "Networking.txt";

/// Install log and audit trail listing
pub const REPORT_LOGS: &str = "Logs.txt";

/// Consolidated summary-mode report
pub const REPORT_SUMMARY: &str = "Summary.txt";

/// Prefix for per-account reports; the account name is appended
pub const REPORT_USERS_PREFIX: &str = "Users_";

// Report section layout
/// Width of the section banner lines
pub const BANNER_WIDTH: usize = 78;

/// Character the banner lines repeat
pub const BANNER_CHAR: char = '=';

/// Raw version sentinel when SystemVersion.plist or its field is absent
pub const VERSION_SENTINEL: &str = "NONE";

/// Maximum trailing log lines echoed into a report section
pub const LOG_TAIL_LINES: usize = 10;
