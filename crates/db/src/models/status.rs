//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` / `node_roles` database table.

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
    /// Render job lifecycle status. Transitions are monotonic:
    /// pending -> in_progress -> completed.
    JobStatus {
        Pending = 1,
        InProgress = 2,
        Completed = 3,
    }
}

define_status_enum! {
    /// Frame processing status. Rendered and Error are terminal.
    FrameStatus {
        Pending = 1,
        Claimed = 2,
        Rendering = 3,
        Rendered = 4,
        Error = 5,
    }
}

define_status_enum! {
    /// Node availability status.
    NodeStatus {
        Active = 1,
        Idle = 2,
        Offline = 3,
    }
}

define_status_enum! {
    /// Node role within the cluster.
    NodeRole {
        Render = 1,
        Coordinator = 2,
    }
}

impl FrameStatus {
    /// Whether this status is terminal. Terminal frames are never eligible
    /// for `claim_next`, regardless of lease age.
    pub fn is_terminal(self) -> bool {
        matches!(self, FrameStatus::Rendered | FrameStatus::Error)
    }
}
