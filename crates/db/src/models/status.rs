//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Export artifact lifecycle status.
    ///
    /// `pending → processing → ready | failed`; no transition out of a
    /// terminal state except deletion.
    ExportStatus {
        Pending = 1,
        Processing = 2,
        Ready = 3,
        Failed = 4,
    }
}

impl ExportStatus {
    /// Database/API name for this status.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    /// Parse from a status ID, `None` for unknown ids.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Pending),
            2 => Some(Self::Processing),
            3 => Some(Self::Ready),
            4 => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_order() {
        assert_eq!(ExportStatus::Pending.id(), 1);
        assert_eq!(ExportStatus::Processing.id(), 2);
        assert_eq!(ExportStatus::Ready.id(), 3);
        assert_eq!(ExportStatus::Failed.id(), 4);
    }

    #[test]
    fn round_trips_through_id() {
        for status in [
            ExportStatus::Pending,
            ExportStatus::Processing,
            ExportStatus::Ready,
            ExportStatus::Failed,
        ] {
            assert_eq!(ExportStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(ExportStatus::from_id(99), None);
    }

    #[test]
    fn names_are_lowercase() {
        assert_eq!(ExportStatus::Pending.name(), "pending");
        assert_eq!(ExportStatus::Failed.name(), "failed");
    }
}
