use bitflags::bitflags;

bitflags! {
    /// Named capabilities carried in a user's permission bitmask.
    ///
    /// Each flag is an independent bit; a user may hold any combination via
    /// bitwise OR. Checks use AND semantics: a requirement is satisfied only
    /// when every required bit is present.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PermissionFlag: u32 {
        const FREE  = 1;
        const PAID  = 2;
        const ADMIN = 4;
    }
}

impl PermissionFlag {
    /// Every defined flag.
    pub const ALL: Self = Self::FREE.union(Self::PAID).union(Self::ADMIN);

    /// Interpret a stored bitmask. Unknown bits are kept so masks round-trip
    /// through updates without truncation; checks only ever test defined bits.
    pub fn from_mask(mask: u32) -> Self {
        Self::from_bits_retain(mask)
    }

    /// Names of the defined flags present in this mask, for audit logs.
    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::FREE) {
            names.push("FREE");
        }
        if self.contains(Self::PAID) {
            names.push("PAID");
        }
        if self.contains(Self::ADMIN) {
            names.push("ADMIN");
        }
        names
    }
}

impl std::fmt::Display for PermissionFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}
