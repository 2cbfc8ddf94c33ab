use strum::Display;

/// Bookkeeping states of the coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleState {
    /// No callback has arrived yet.
    #[default]
    Idle,
    /// `starting` arrived; the environment may or may not be resolved.
    Starting,
    /// The context has been prepared.
    Prepared,
    /// Startup completed.
    Started,
    /// Startup failed.
    Failed,
}

/// Framework callbacks, used to describe transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Callback {
    /// `starting`
    Starting,
    /// `environment_prepared`
    EnvironmentPrepared,
    /// `context_prepared`
    ContextPrepared,
    /// `context_loaded`
    ContextLoaded,
    /// `started`
    Started,
    /// `running`
    Running,
    /// `failed`
    Failed,
}

impl LifecycleState {
    /// Whether the coordinator's bookkeeping has finished.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Started | Self::Failed)
    }

    /// State reached by accepting `callback`, or `None` when it is rejected.
    #[must_use]
    pub const fn next(self, callback: Callback) -> Option<Self> {
        match (self, callback) {
            (Self::Idle | Self::Starting, Callback::Starting)
            | (Self::Starting, Callback::EnvironmentPrepared) => Some(Self::Starting),
            (Self::Starting, Callback::ContextPrepared) => Some(Self::Prepared),
            (state, Callback::ContextLoaded | Callback::Running) => Some(state),
            (Self::Prepared, Callback::Started) => Some(Self::Started),
            (Self::Idle | Self::Starting | Self::Prepared, Callback::Failed) => Some(Self::Failed),
            _ => None,
        }
    }
}
