//! Data submissions - the write capability handed to an acting agent.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace, warn};

use super::{BusState, ManagerId};
use crate::error::{BusError, Result};
use crate::packet::{DataType, Payload};

/// Write access to the channel batch for one agent during one turn.
///
/// A submission is active only while the agent it was issued to is acting.
/// Once the next agent's turn begins, or the tick ends, every call to
/// [`add`](Self::add) fails with [`BusError::InvalidOperation`]. Agents may
/// clone and keep a submission, but a kept submission never becomes active
/// again.
#[derive(Clone)]
pub struct DataSubmission {
    manager_id: ManagerId,
    sender_id: String,
    generation: u64,
    state: Rc<RefCell<BusState>>,
}

impl DataSubmission {
    pub(crate) fn new(
        manager_id: ManagerId,
        sender_id: String,
        generation: u64,
        state: Rc<RefCell<BusState>>,
    ) -> Self {
        Self {
            manager_id,
            sender_id,
            generation,
            state,
        }
    }

    pub fn manager_id(&self) -> ManagerId {
        self.manager_id
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Whether this is the manager's current submission.
    pub fn is_active(&self) -> bool {
        self.state
            .try_borrow()
            .map(|state| state.active == Some(self.generation))
            .unwrap_or(false)
    }

    /// Post `data` to the back buffer of `T`'s channel. Other agents see it
    /// from the next tick on.
    pub fn add<T: Payload>(&self, data: T) -> Result<()> {
        let mut state = self.open_state()?;
        state.batch.post(&self.sender_id, data)?;
        self.log_accepted(state.log_packets, DataType::of::<T>());
        Ok(())
    }

    /// Type-erased form of [`add`](Self::add). Fails with a type mismatch if
    /// `data` is not of `data_type`.
    pub fn add_erased(&self, data_type: DataType, data: Box<dyn Any>) -> Result<()> {
        let mut state = self.open_state()?;
        state.batch.post_erased(data_type, &self.sender_id, data)?;
        self.log_accepted(state.log_packets, data_type);
        Ok(())
    }

    /// Borrow the bus state for writing, if this submission may write.
    ///
    /// The state can only be borrowed elsewhere while agents perceive, and no
    /// submission is active then, so both failures are one rejection.
    fn open_state(&self) -> Result<std::cell::RefMut<'_, BusState>> {
        let state = if self.is_active() {
            self.state.try_borrow_mut().ok()
        } else {
            None
        };
        state.ok_or_else(|| {
            warn!(
                sender_id = %self.sender_id,
                manager_id = %self.manager_id,
                "rejected write through inactive submission"
            );
            BusError::InvalidOperation("cannot add through an inactive submission".into())
        })
    }

    fn log_accepted(&self, log_packets: bool, data_type: DataType) {
        if log_packets {
            debug!(sender_id = %self.sender_id, %data_type, "packet submitted");
        } else {
            trace!(sender_id = %self.sender_id, %data_type, "packet submitted");
        }
    }
}

impl PartialEq for DataSubmission {
    fn eq(&self, other: &Self) -> bool {
        self.manager_id == other.manager_id
            && self.generation == other.generation
            && self.sender_id == other.sender_id
    }
}

impl Eq for DataSubmission {}

impl std::fmt::Debug for DataSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSubmission")
            .field("manager_id", &self.manager_id)
            .field("sender_id", &self.sender_id)
            .field("generation", &self.generation)
            .finish()
    }
}

impl std::fmt::Display for DataSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DataSubmission {{ manager_id = {}, sender_id = {} }}",
            self.manager_id, self.sender_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ChannelBatch;
    use crate::config::BusConfig;

    fn state_with_i32() -> Rc<RefCell<BusState>> {
        let batch = ChannelBatch::builder().with_channel::<i32>().build();
        Rc::new(RefCell::new(BusState::new(batch, &BusConfig::default())))
    }

    #[test]
    fn test_active_submission_posts() {
        let state = state_with_i32();
        let generation = state.borrow_mut().open_submission();
        let submission = DataSubmission::new(ManagerId::new(), "alice".into(), generation, state.clone());

        assert!(submission.is_active());
        submission.add(5).unwrap();
        assert_eq!(state.borrow().batch.pending_count(), 1);
    }

    #[test]
    fn test_superseded_submission_rejected() {
        let state = state_with_i32();
        let manager_id = ManagerId::new();

        let first_gen = state.borrow_mut().open_submission();
        let first = DataSubmission::new(manager_id, "alice".into(), first_gen, state.clone());
        let second_gen = state.borrow_mut().open_submission();
        let second = DataSubmission::new(manager_id, "bob".into(), second_gen, state.clone());

        assert!(!first.is_active());
        assert!(second.is_active());
        assert!(matches!(first.add(1), Err(BusError::InvalidOperation(_))));
        assert_eq!(state.borrow().batch.pending_count(), 0);
    }

    #[test]
    fn test_closed_submission_rejected() {
        let state = state_with_i32();
        let generation = state.borrow_mut().open_submission();
        let submission = DataSubmission::new(ManagerId::new(), "alice".into(), generation, state.clone());

        state.borrow_mut().close_submission();

        assert!(!submission.is_active());
        assert!(matches!(submission.add(1), Err(BusError::InvalidOperation(_))));
    }

    #[test]
    fn test_busy_state_rejected_as_inactive() {
        let state = state_with_i32();
        let generation = state.borrow_mut().open_submission();
        let submission = DataSubmission::new(ManagerId::new(), "alice".into(), generation, state.clone());

        let reader = state.borrow();
        let result = submission.add(1);
        drop(reader);

        assert_eq!(
            result,
            Err(BusError::InvalidOperation(
                "cannot add through an inactive submission".into()
            ))
        );
        assert_eq!(state.borrow().batch.pending_count(), 0);
    }

    #[test]
    fn test_unsupported_type_rejected() {
        let state = state_with_i32();
        let generation = state.borrow_mut().open_submission();
        let submission = DataSubmission::new(ManagerId::new(), "alice".into(), generation, state);

        let result = submission.add("text");
        assert!(matches!(result, Err(BusError::UnsupportedType(_))));
    }

    #[test]
    fn test_erased_add() {
        let state = state_with_i32();
        let generation = state.borrow_mut().open_submission();
        let submission = DataSubmission::new(ManagerId::new(), "alice".into(), generation, state.clone());

        let mismatch = submission.add_erased(DataType::of::<i32>(), Box::new(2.0f32));
        assert!(matches!(mismatch, Err(BusError::TypeMismatch { .. })));

        submission.add_erased(DataType::of::<i32>(), Box::new(2i32)).unwrap();
        assert_eq!(state.borrow().batch.pending_count(), 1);
    }
}
