use crate::value::ParamValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub value: ParamValue,
}

/// A time-sorted set of keyframes, implementing the `KeyframeParam` mixin
/// operations (`getNumKeys`/`getKeyTime`/`getKeyIndex`/`deleteKey`/
/// `deleteAllKeys`/`copyFrom`) every animatable parameter instance kind
/// carries (§4.F supplement; `ofxhParam.h::KeyframeParam`).
#[derive(Debug, Default, Clone)]
pub struct KeyframeTrack {
    keys: Vec<Keyframe>,
}

/// Search direction for [`KeyframeTrack::key_index`], mirroring the
/// `eDirectionLess` vs `eDirectionMore`-equivalent two-way search used by
/// `getKeyIndex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Backward,
    Forward,
}

impl KeyframeTrack {
    #[must_use]
    pub fn num_keys(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn key_time(&self, nth: usize) -> Option<f64> {
        self.keys.get(nth).map(|k| k.time)
    }

    /// Finds the index of the nearest key in `direction` from `time`
    /// (inclusive of an exact match).
    #[must_use]
    pub fn key_index(&self, time: f64, direction: SearchDirection) -> Option<usize> {
        match direction {
            SearchDirection::Backward => self
                .keys
                .iter()
                .rposition(|k| k.time <= time),
            SearchDirection::Forward => self.keys.iter().position(|k| k.time >= time),
        }
    }

    /// Inserts or replaces the keyframe at `time`, keeping the track sorted.
    pub fn set_key(&mut self, time: f64, value: ParamValue) {
        match self
            .keys
            .binary_search_by(|k| k.time.partial_cmp(&time).unwrap_or(std::cmp::Ordering::Equal))
        {
            Ok(i) => self.keys[i].value = value,
            Err(i) => self.keys.insert(i, Keyframe { time, value }),
        }
    }

    /// Value at or immediately before `time`; falls back to the first key
    /// if `time` precedes every keyframe. A host support library does not
    /// evaluate interpolation curves itself (the original's `derive`
    /// methods are documented "not needed" for most kinds) — this returns
    /// the held value at the nearest earlier sample.
    #[must_use]
    pub fn value_at(&self, time: f64) -> Option<&ParamValue> {
        let idx = self
            .keys
            .iter()
            .rposition(|k| k.time <= time)
            .unwrap_or(0);
        self.keys.get(idx).map(|k| &k.value)
    }

    pub fn delete_key(&mut self, time: f64) -> bool {
        if let Some(i) = self.keys.iter().position(|k| k.time == time) {
            self.keys.remove(i);
            true
        } else {
            false
        }
    }

    pub fn delete_all_keys(&mut self) {
        self.keys.clear();
    }

    /// Copies every keyframe from `other`, shifting each time by `offset`.
    pub fn copy_from(&mut self, other: &KeyframeTrack, offset: f64) {
        self.keys = other
            .keys
            .iter()
            .map(|k| Keyframe {
                time: k.time + offset,
                value: k.value.clone(),
            })
            .collect();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_key_keeps_track_sorted() {
        let mut track = KeyframeTrack::default();
        track.set_key(10.0, ParamValue::Int(vec![1]));
        track.set_key(5.0, ParamValue::Int(vec![0]));
        track.set_key(20.0, ParamValue::Int(vec![2]));
        assert_eq!(track.key_time(0), Some(5.0));
        assert_eq!(track.key_time(1), Some(10.0));
        assert_eq!(track.key_time(2), Some(20.0));
    }

    #[test]
    fn value_at_uses_nearest_earlier_key() {
        let mut track = KeyframeTrack::default();
        track.set_key(0.0, ParamValue::Int(vec![1]));
        track.set_key(10.0, ParamValue::Int(vec![2]));
        assert_eq!(track.value_at(5.0), Some(&ParamValue::Int(vec![1])));
        assert_eq!(track.value_at(10.0), Some(&ParamValue::Int(vec![2])));
        assert_eq!(track.value_at(100.0), Some(&ParamValue::Int(vec![2])));
    }

    #[test]
    fn delete_key_removes_exact_match_only() {
        let mut track = KeyframeTrack::default();
        track.set_key(1.0, ParamValue::Int(vec![1]));
        assert!(!track.delete_key(2.0));
        assert!(track.delete_key(1.0));
        assert_eq!(track.num_keys(), 0);
    }

    #[test]
    fn copy_from_shifts_times_by_offset() {
        let mut src = KeyframeTrack::default();
        src.set_key(1.0, ParamValue::Int(vec![9]));
        let mut dst = KeyframeTrack::default();
        dst.copy_from(&src, 5.0);
        assert_eq!(dst.key_time(0), Some(6.0));
    }

    #[test]
    fn key_index_searches_both_directions() {
        let mut track = KeyframeTrack::default();
        track.set_key(0.0, ParamValue::Int(vec![0]));
        track.set_key(10.0, ParamValue::Int(vec![1]));
        assert_eq!(track.key_index(4.0, SearchDirection::Backward), Some(0));
        assert_eq!(track.key_index(4.0, SearchDirection::Forward), Some(1));
    }
}
