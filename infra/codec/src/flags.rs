use bitflags::bitflags;

bitflags! {
    /// Leading flag byte of a package state record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PackageFlags: u8 {
        const LINK_HANDLING_ALLOWED = 0x08;
    }
}

bitflags! {
    /// Leading flag byte of a geolocation suggestion record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SuggestionFlags: u8 {
        const HAS_ZONE_IDS = 0x01;
    }
}
