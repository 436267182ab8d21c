//! Animatable properties and the per-property composition chain.
//!
//! A chain folds its instances over the property's base value in registration
//! order and writes the result back. Order matters: additive rotations do not
//! commute.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::AnimationError;
use crate::ids::{ChainId, InstanceId};
use crate::instance::AnimationInstance;
use crate::value::AnimationValue;
use crate::Result;

/// A value that animations can drive.
pub trait AnimatableProperty<T: AnimationValue> {
    /// The value without any animation applied.
    fn base_value(&self) -> T;

    /// Store the composed animation value.
    fn set_value(&mut self, value: T);

    /// Drop the animation value; the property shows its base value again.
    fn clear_value(&mut self);
}

/// Properties are shared between the caller and the composition chain.
pub type SharedProperty<T> = Rc<RefCell<dyn AnimatableProperty<T>>>;

/// A plain property: a base value plus an optional animated override.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimatableValue<T> {
    pub base: T,
    animated: Option<T>,
}

impl<T: AnimationValue> AnimatableValue<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            animated: None,
        }
    }

    /// Wrap into a [`SharedProperty`], also returning the typed handle.
    pub fn shared(base: T) -> (Rc<RefCell<Self>>, SharedProperty<T>) {
        let typed = Rc::new(RefCell::new(Self::new(base)));
        let erased: SharedProperty<T> = typed.clone();
        (typed, erased)
    }

    /// Animated value if any, else the base value.
    pub fn value(&self) -> &T {
        self.animated.as_ref().unwrap_or(&self.base)
    }

    pub fn is_animated(&self) -> bool {
        self.animated.is_some()
    }
}

impl<T: AnimationValue> AnimatableProperty<T> for AnimatableValue<T> {
    fn base_value(&self) -> T {
        self.base.clone()
    }

    fn set_value(&mut self, value: T) {
        self.animated = Some(value);
    }

    fn clear_value(&mut self) {
        if let Some(old) = self.animated.take() {
            old.recycle();
        }
    }
}

/// Instances animating one property, in registration order.
pub struct CompositionChain<T: AnimationValue> {
    id: ChainId,
    property: SharedProperty<T>,
    instances: Vec<AnimationInstance<T>>,
}

impl<T: AnimationValue> CompositionChain<T> {
    pub fn new(id: ChainId, property: SharedProperty<T>, capacity: usize) -> Self {
        Self {
            id,
            property,
            instances: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn property(&self) -> &SharedProperty<T> {
        &self.property
    }

    pub fn push(&mut self, instance: AnimationInstance<T>) {
        self.instances.push(instance);
    }

    /// Remove an instance, keeping the order of the rest.
    pub fn remove(&mut self, id: InstanceId) -> Option<AnimationInstance<T>> {
        let index = self.instances.iter().position(|i| i.id() == id)?;
        Some(self.instances.remove(index))
    }

    pub fn get(&self, id: InstanceId) -> Option<&AnimationInstance<T>> {
        self.instances.iter().find(|i| i.id() == id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut AnimationInstance<T>> {
        self.instances.iter_mut().find(|i| i.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnimationInstance<T>> {
        self.instances.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, AnimationInstance<T>> {
        self.instances.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Fold every producing instance over the base value.
    ///
    /// Returns the composed value and the number of contributing instances,
    /// or `None` when nothing is producing.
    pub fn compose(&self) -> Result<Option<(T, usize)>> {
        let mut failed = Vec::new();
        let composed = self.fold(&mut failed);
        match failed.into_iter().next() {
            Some((_, error)) => Err(error),
            None => Ok(composed),
        }
    }

    /// Compose and write the property. Returns the contributor count.
    pub fn apply(&self) -> Result<usize> {
        let composed = self.compose()?;
        Ok(self.write(composed))
    }

    /// Like [`CompositionChain::apply`], but instances that fail to evaluate
    /// are skipped and returned instead of aborting the whole chain.
    pub fn apply_skipping_failed(&self) -> (usize, Vec<(InstanceId, AnimationError)>) {
        let mut failed = Vec::new();
        let composed = self.fold(&mut failed);
        (self.write(composed), failed)
    }

    fn fold(&self, failed: &mut Vec<(InstanceId, AnimationError)>) -> Option<(T, usize)> {
        let base = self.property.borrow().base_value();
        let mut current = base.clone();
        let mut contributors = 0;
        for instance in &self.instances {
            if !instance.state().is_producing() {
                continue;
            }
            match instance.compose(&current, &base) {
                Ok(next) => {
                    current = next;
                    contributors += 1;
                }
                Err(error) => failed.push((instance.id(), error)),
            }
        }
        base.recycle();
        (contributors > 0).then_some((current, contributors))
    }

    fn write(&self, composed: Option<(T, usize)>) -> usize {
        match composed {
            Some((value, contributors)) => {
                self.property.borrow_mut().set_value(value);
                contributors
            }
            None => {
                self.property.borrow_mut().clear_value();
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_to_by::FromToByAnimation;
    use crate::time::AnimationTime;

    #[test]
    fn chain_composes_in_order_and_clears_when_idle() {
        let (typed, property) = AnimatableValue::shared(1.0f32);
        let mut chain = CompositionChain::new(ChainId(0), property, 2);

        let set = FromToByAnimation::new().with_to(10.0f32);
        let add = FromToByAnimation::new()
            .with_from(5.0f32)
            .with_to(5.0)
            .additive(true);
        let mut first = AnimationInstance::new(InstanceId(0), Rc::new(set));
        let mut second = AnimationInstance::new(InstanceId(1), Rc::new(add));
        first.set_time(Some(AnimationTime::from_secs(1)));
        second.set_time(Some(AnimationTime::ZERO));
        chain.push(first);
        chain.push(second);

        assert_eq!(chain.apply().unwrap(), 2);
        assert_eq!(*typed.borrow().value(), 15.0);

        for inst in chain.iter_mut() {
            inst.stop();
        }
        assert_eq!(chain.apply().unwrap(), 0);
        assert!(!typed.borrow().is_animated());
        assert_eq!(*typed.borrow().value(), 1.0);
    }

    #[test]
    fn failed_instances_are_skipped_on_request() {
        use crate::clip::AnimationClip;

        let (typed, property) = AnimatableValue::shared(0.0f32);
        let mut chain = CompositionChain::new(ChainId(3), property, 2);
        let broken = AnimationClip::wrap(FromToByAnimation::new().with_to(1.0f32))
            .with_window(AnimationTime::from_secs(1), AnimationTime::ZERO);
        let mut bad = AnimationInstance::new(InstanceId(7), Rc::new(broken));
        let mut good = AnimationInstance::new(
            InstanceId(8),
            Rc::new(FromToByAnimation::new().with_from(4.0f32).with_to(4.0)),
        );
        bad.start();
        good.start();
        chain.push(bad);
        chain.push(good);

        assert!(matches!(
            chain.apply(),
            Err(AnimationError::InvalidClipWindow { .. })
        ));
        assert!(!typed.borrow().is_animated());

        let (contributors, failed) = chain.apply_skipping_failed();
        assert_eq!(contributors, 1);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, InstanceId(7));
        assert_eq!(*typed.borrow().value(), 4.0);
    }
}
