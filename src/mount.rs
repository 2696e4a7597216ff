//! Host-lifecycle driver for a backdrop.
//!
//! A [`SceneMount`] owns the engine, host and container handles, keeps at
//! most one [`SceneSession`] alive and exposes the readiness flag. The host
//! calls `mount`, `update_config` and `unmount` from its lifecycle hooks and
//! forwards frame, resize and pointer notifications.

use crate::config::SceneConfig;
use crate::error::Result;
use crate::session::SceneSession;
use crate::traits::{Container, Engine, FrameHandle, Host, PointerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Disposed,
}

pub struct SceneMount<E: Engine, H: Host, C: Container> {
    engine: E,
    host: H,
    container: C,
    config: SceneConfig,
    session: Option<SceneSession<E::Surface>>,
    state: SessionState,
    mounted: bool,
}

impl<E: Engine, H: Host, C: Container> SceneMount<E, H, C> {
    pub fn new(engine: E, host: H, container: C, config: SceneConfig) -> Self {
        Self {
            engine,
            host,
            container,
            config,
            session: None,
            state: SessionState::Uninitialized,
            mounted: false,
        }
    }

    /// Build the session for the current configuration
    ///
    /// A detached container leaves the mount not ready without error; the
    /// host may call `mount` again once the container is attached.
    pub fn mount(&mut self) -> Result<()> {
        self.mounted = true;
        if self.session.is_some() {
            return Ok(());
        }

        let previous = self.state;
        self.state = SessionState::Initializing;

        match SceneSession::initialize(
            &mut self.engine,
            &mut self.host,
            &mut self.container,
            &self.config,
        ) {
            Ok(Some(session)) => {
                self.session = Some(session);
                self.state = SessionState::Ready;
                Ok(())
            }
            Ok(None) => {
                self.state = previous;
                Ok(())
            }
            Err(err) => {
                self.state = previous;
                Err(err)
            }
        }
    }

    /// Swap in a new configuration, rebuilding the session when mounted
    pub fn update_config(&mut self, config: SceneConfig) -> Result<()> {
        if config == self.config {
            return Ok(());
        }
        config.validate()?;

        self.teardown();
        self.config = config;

        if self.mounted {
            self.mount()?;
        }
        Ok(())
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.teardown();
    }

    /// Run the frame callback if `handle` belongs to the live session
    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.pending_frame() != Some(handle) {
            log::trace!("Ignoring stale frame {:?}", handle);
            return false;
        }

        if let Err(err) = session.animate(&mut self.host) {
            log::error!("Render error: {}", err);
        }
        true
    }

    pub fn on_resize(&mut self) {
        if self.state != SessionState::Ready {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.handle_resize(&self.host, &self.container);
        }
    }

    /// Returns whether the camera moved
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> bool {
        if self.state != SessionState::Ready {
            return false;
        }
        match self.session.as_mut() {
            Some(session) => session.handle_pointer_move(&self.container, event),
            None => false,
        }
    }

    /// Readiness flag: true only once a session is fully built
    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&SceneSession<E::Surface>> {
        self.session.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.dispose(&mut self.host, &mut self.container);
            self.state = SessionState::Disposed;
        }
    }
}
