//! Animation manager: owns the running instances of every animated property
//! and steps them once per tick.
//!
//! Each property gets one composition chain, created on the first
//! `start_animation` for it and released once its last instance is detached.
//! Chains of different value types live side by side behind a type-erased
//! chain trait.

use std::any::Any;
use std::rc::Rc;

use hashbrown::HashMap;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::animation::SharedAnimation;
use crate::composition::{CompositionChain, SharedProperty};
use crate::config::Config;
use crate::error::AnimationError;
use crate::ids::{ChainId, IdAllocator, InstanceId};
use crate::instance::AnimationInstance;
use crate::outputs::{AnimationEvent, Change, Outputs};
use crate::time::AnimationTime;
use crate::timing::AnimationState;
use crate::value::AnimationValue;
use crate::Result;

/// What happens to instances already animating a property when a new one
/// starts on it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandoffBehavior {
    /// Append the new instance on top of the existing ones.
    #[default]
    Compose,
    /// Stop the existing instances.
    Replace,
}

/// Type-independent playback controls of an instance.
trait InstanceControl {
    fn state(&self) -> AnimationState;
    fn time(&self) -> Option<AnimationTime>;
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn set_weight(&mut self, weight: f32) -> Result<()>;
    fn set_speed(&mut self, speed: f64) -> Result<()>;
}

impl<T: AnimationValue> InstanceControl for AnimationInstance<T> {
    fn state(&self) -> AnimationState {
        AnimationInstance::state(self)
    }

    fn time(&self) -> Option<AnimationTime> {
        AnimationInstance::time(self)
    }

    fn pause(&mut self) {
        AnimationInstance::pause(self)
    }

    fn resume(&mut self) {
        AnimationInstance::resume(self)
    }

    fn stop(&mut self) {
        AnimationInstance::stop(self)
    }

    fn set_weight(&mut self, weight: f32) -> Result<()> {
        AnimationInstance::set_weight(self, weight)
    }

    fn set_speed(&mut self, speed: f64) -> Result<()> {
        AnimationInstance::set_speed(self, speed)
    }
}

/// A natural state change seen while advancing.
struct Transition {
    instance: InstanceId,
    time: Option<AnimationTime>,
    previous: AnimationState,
    next: AnimationState,
}

/// A composition chain with its value type erased.
trait ErasedChain {
    fn len(&self) -> usize;
    fn instance(&self, id: InstanceId) -> Option<&dyn InstanceControl>;
    fn instance_mut(&mut self, id: InstanceId) -> Option<&mut dyn InstanceControl>;
    fn advance(&mut self, dt: AnimationTime, transitions: &mut Vec<Transition>);
    fn apply(&self) -> (usize, Vec<(InstanceId, AnimationError)>);
    fn detach_stopped(&mut self) -> Vec<InstanceId>;
    fn release(&self);
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: AnimationValue> ErasedChain for CompositionChain<T> {
    fn len(&self) -> usize {
        CompositionChain::len(self)
    }

    fn instance(&self, id: InstanceId) -> Option<&dyn InstanceControl> {
        self.get(id).map(|i| i as &dyn InstanceControl)
    }

    fn instance_mut(&mut self, id: InstanceId) -> Option<&mut dyn InstanceControl> {
        self.get_mut(id).map(|i| i as &mut dyn InstanceControl)
    }

    fn advance(&mut self, dt: AnimationTime, transitions: &mut Vec<Transition>) {
        for instance in self.iter_mut() {
            let (previous, next) = instance.advance(dt);
            // explicit stops are reported by the manager itself
            if previous != next && !instance.is_stopped() {
                transitions.push(Transition {
                    instance: instance.id(),
                    time: instance.time(),
                    previous,
                    next,
                });
            }
        }
    }

    fn apply(&self) -> (usize, Vec<(InstanceId, AnimationError)>) {
        self.apply_skipping_failed()
    }

    fn detach_stopped(&mut self) -> Vec<InstanceId> {
        let stopped: Vec<InstanceId> = self
            .iter()
            .filter(|i| i.state() == AnimationState::Stopped)
            .map(|i| i.id())
            .collect();
        for id in &stopped {
            self.remove(*id);
        }
        stopped
    }

    fn release(&self) {
        self.property().borrow_mut().clear_value();
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Address of the shared property, used to find its chain.
fn property_key<T: AnimationValue>(property: &SharedProperty<T>) -> usize {
    Rc::as_ptr(property) as *const () as usize
}

/// Drives every running animation instance.
pub struct AnimationManager {
    cfg: Config,
    ids: IdAllocator,
    chains: HashMap<ChainId, Box<dyn ErasedChain>>,
    /// Chains in creation order; update order is deterministic.
    order: Vec<ChainId>,
    by_property: HashMap<usize, ChainId>,
    owner: HashMap<InstanceId, ChainId>,
    /// Events raised between ticks, reported by the next update.
    pending: Vec<AnimationEvent>,
    outputs: Outputs,
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AnimationManager {
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            ids: IdAllocator::new(),
            chains: HashMap::new(),
            order: Vec::new(),
            by_property: HashMap::new(),
            owner: HashMap::new(),
            pending: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Start `animation` on `property`. The instance begins at time zero and
    /// is evaluated from the next [`AnimationManager::update`].
    ///
    /// Fails when the property is already animated with a different value
    /// type (the same property object viewed through another type).
    pub fn start_animation<T: AnimationValue>(
        &mut self,
        animation: SharedAnimation<T>,
        property: &SharedProperty<T>,
        handoff: HandoffBehavior,
    ) -> Result<InstanceId> {
        let key = property_key(property);
        let chain_id = match self.by_property.get(&key) {
            Some(id) => *id,
            None => {
                let id = self.ids.alloc_chain();
                let chain =
                    CompositionChain::new(id, Rc::clone(property), self.cfg.chain_capacity);
                self.chains.insert(id, Box::new(chain));
                self.order.push(id);
                self.by_property.insert(key, id);
                trace!("created composition chain {:?}", id);
                id
            }
        };

        let chain = self
            .chains
            .get_mut(&chain_id)
            .and_then(|c| c.as_any_mut().downcast_mut::<CompositionChain<T>>())
            .ok_or_else(|| {
                AnimationError::invalid(format!(
                    "property of chain {:?} is animated with another value type",
                    chain_id
                ))
            })?;

        if handoff == HandoffBehavior::Replace {
            for existing in chain.iter_mut() {
                if existing.state() != AnimationState::Stopped {
                    existing.stop();
                    debug!("replaced instance {:?}", existing.id());
                    self.pending.push(AnimationEvent::Stopped {
                        instance: existing.id(),
                    });
                }
            }
        }

        let id = self.ids.alloc_instance();
        let mut instance = AnimationInstance::new(id, animation);
        instance.start();
        chain.push(instance);
        self.owner.insert(id, chain_id);
        debug!("started instance {:?} on chain {:?} ({:?})", id, chain_id, handoff);
        Ok(id)
    }

    fn control(&self, id: InstanceId) -> Option<&dyn InstanceControl> {
        let chain = self.owner.get(&id)?;
        self.chains.get(chain)?.instance(id)
    }

    fn control_mut(&mut self, id: InstanceId) -> Result<&mut dyn InstanceControl> {
        self.owner
            .get(&id)
            .and_then(|chain| self.chains.get_mut(chain))
            .and_then(|chain| chain.instance_mut(id))
            .ok_or(AnimationError::UnknownInstance { instance: id.0 })
    }

    /// Stop an instance. It stops contributing from the next update.
    pub fn stop_animation(&mut self, id: InstanceId) -> Result<()> {
        let instance = self.control_mut(id)?;
        if instance.state() == AnimationState::Stopped {
            return Ok(());
        }
        instance.stop();
        debug!("stopped instance {:?}", id);
        self.pending.push(AnimationEvent::Stopped { instance: id });
        Ok(())
    }

    pub fn pause(&mut self, id: InstanceId) -> Result<()> {
        self.control_mut(id)?.pause();
        Ok(())
    }

    pub fn resume(&mut self, id: InstanceId) -> Result<()> {
        self.control_mut(id)?.resume();
        Ok(())
    }

    pub fn set_weight(&mut self, id: InstanceId, weight: f32) -> Result<()> {
        self.control_mut(id)?.set_weight(weight)
    }

    pub fn set_speed(&mut self, id: InstanceId, speed: f64) -> Result<()> {
        self.control_mut(id)?.set_speed(speed)
    }

    /// `None` once the instance is detached (or was never started).
    pub fn instance_state(&self, id: InstanceId) -> Option<AnimationState> {
        self.control(id).map(|i| i.state())
    }

    pub fn instance_time(&self, id: InstanceId) -> Option<AnimationTime> {
        self.control(id).and_then(|i| i.time())
    }

    /// Instances currently attached, including stopped ones not yet detached.
    pub fn instance_count(&self) -> usize {
        self.chains.values().map(|c| c.len()).sum()
    }

    /// Properties currently driven by at least one attached instance.
    pub fn property_count(&self) -> usize {
        self.chains.len()
    }

    fn push_event(&mut self, event: AnimationEvent, dropped: &mut usize) {
        if self.outputs.events.len() < self.cfg.max_events_per_tick {
            self.outputs.push_event(event);
        } else {
            *dropped += 1;
        }
    }

    /// Step every instance by `dt`, compose each chain and write its property.
    ///
    /// An instance that fails to evaluate is stopped and reported with
    /// [`AnimationEvent::Failed`]; the rest of the tick proceeds normally.
    pub fn update(&mut self, dt: AnimationTime) -> &Outputs {
        self.outputs.clear();
        let mut dropped = 0usize;

        for event in std::mem::take(&mut self.pending) {
            self.push_event(event, &mut dropped);
        }

        // 1) advance and report natural transitions
        let mut transitions = Vec::new();
        for id in &self.order {
            if let Some(chain) = self.chains.get_mut(id) {
                chain.advance(dt, &mut transitions);
            }
        }
        for t in transitions {
            if t.previous == AnimationState::Scheduled {
                self.push_event(AnimationEvent::Started { instance: t.instance }, &mut dropped);
            }
            let ended = |s: AnimationState| {
                matches!(s, AnimationState::Filling | AnimationState::Stopped)
            };
            if !ended(t.previous) && ended(t.next) {
                self.push_event(
                    AnimationEvent::Completed {
                        instance: t.instance,
                        time: t.time.unwrap_or(AnimationTime::ZERO),
                    },
                    &mut dropped,
                );
            }
        }

        // 2) compose and write
        let mut failures = Vec::new();
        for id in &self.order {
            let Some(chain) = self.chains.get_mut(id) else {
                continue;
            };
            let (contributors, failed) = chain.apply();
            for (instance, error) in failed {
                if let Some(control) = chain.instance_mut(instance) {
                    control.stop();
                }
                warn!("instance {:?} on chain {:?} failed: {}", instance, id, error);
                failures.push(AnimationEvent::Failed {
                    instance,
                    chain: *id,
                    error,
                });
            }
            if contributors > 0 {
                self.outputs.push_change(Change {
                    chain: *id,
                    contributors,
                });
            }
        }
        for event in failures {
            self.push_event(event, &mut dropped);
        }

        // 3) detach stopped instances and release idle properties
        if self.cfg.detach_stopped {
            let mut released = Vec::new();
            for id in &self.order {
                let Some(chain) = self.chains.get_mut(id) else {
                    continue;
                };
                for instance in chain.detach_stopped() {
                    self.owner.remove(&instance);
                    debug!("detached instance {:?} from chain {:?}", instance, id);
                }
                if chain.len() == 0 {
                    chain.release();
                    released.push(*id);
                }
            }
            for id in released {
                self.chains.remove(&id);
                self.order.retain(|c| *c != id);
                self.by_property.retain(|_, c| *c != id);
                trace!("released composition chain {:?}", id);
                self.push_event(AnimationEvent::PropertyReleased { chain: id }, &mut dropped);
            }
        }

        if dropped > 0 {
            warn!(
                "event cap of {} per tick reached; dropped {} events",
                self.cfg.max_events_per_tick, dropped
            );
        }
        &self.outputs
    }
}
