//! Aggregator service for grouping order lines into buckets

use crate::types::{Bucket, EnrichedLine, GroupKey, KeyValue, Measure, Representative};
use std::collections::{HashMap, HashSet};

/// Composite keys are limited to three levels (e.g. group / month / item)
pub const MAX_GROUP_KEYS: usize = 3;

/// Running state of one bucket during the single reduction pass
struct Accumulator<'a> {
    key: Vec<KeyValue>,
    lines: u64,
    amount: f64,
    quantity: f64,
    orders: HashSet<&'a str>,
    first: Representative,
}

impl<'a> Accumulator<'a> {
    fn new(key: Vec<KeyValue>, line: &EnrichedLine<'a>) -> Self {
        Self {
            key,
            lines: 0,
            amount: 0.0,
            quantity: 0.0,
            orders: HashSet::new(),
            first: Representative {
                item_code: line.line.item_code.clone(),
                item_name: line.line.item_name.clone(),
                group_code: line.line.group_code.clone(),
                group_name: line.line.group_name.clone(),
            },
        }
    }

    fn add(&mut self, line: &EnrichedLine<'a>) {
        self.lines = self.lines.saturating_add(1);
        self.amount += line.line.amount;
        self.quantity += line.line.quantity;
        self.orders.insert(line.line.order_code.as_str());
    }

    fn finish(self) -> Bucket {
        Bucket {
            key: self.key,
            lines: self.lines,
            amount: self.amount,
            quantity: self.quantity,
            distinct_orders: self.orders.len() as u64,
            first: self.first,
        }
    }
}

/// Aggregator for grouping and reducing order lines
pub struct Aggregator;

impl Aggregator {
    /// Value of a single grouping key for a line
    pub fn key_value(line: &EnrichedLine<'_>, key: GroupKey) -> KeyValue {
        let number = |v: Option<u32>| v.map(KeyValue::Number).unwrap_or(KeyValue::Unknown);
        match key {
            GroupKey::Item => KeyValue::Text(line.item_label.clone()),
            GroupKey::ItemCode => KeyValue::Text(line.line.item_code.clone()),
            GroupKey::Group => KeyValue::Text(line.group_label.clone()),
            GroupKey::GroupCode => KeyValue::Text(line.line.group_code.clone()),
            GroupKey::Customer => KeyValue::Text(line.line.customer_code.clone()),
            GroupKey::Month => number(line.month),
            GroupKey::Weekday => number(line.weekday),
            GroupKey::DayOfMonth => number(line.day_of_month),
            GroupKey::Hour => number(line.hour),
        }
    }

    /// Group lines by the given keys. Buckets come back in order of first
    /// occurrence; every line lands in exactly one bucket.
    pub fn group_by(lines: &[EnrichedLine<'_>], keys: &[GroupKey]) -> Vec<Bucket> {
        debug_assert!(keys.len() <= MAX_GROUP_KEYS, "too many grouping keys");

        let mut index: HashMap<Vec<KeyValue>, usize> = HashMap::new();
        let mut accumulators: Vec<Accumulator> = Vec::new();

        for line in lines {
            let key: Vec<KeyValue> = keys.iter().map(|k| Self::key_value(line, *k)).collect();
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    accumulators.push(Accumulator::new(key.clone(), line));
                    index.insert(key, accumulators.len() - 1);
                    accumulators.len() - 1
                }
            };
            accumulators[slot].add(line);
        }

        accumulators.into_iter().map(Accumulator::finish).collect()
    }

    /// One bucket covering every line (empty key)
    pub fn total(lines: &[EnrichedLine<'_>]) -> Bucket {
        Self::group_by(lines, &[])
            .into_iter()
            .next()
            .unwrap_or(Bucket {
                key: Vec::new(),
                lines: 0,
                amount: 0.0,
                quantity: 0.0,
                distinct_orders: 0,
                first: Representative::default(),
            })
    }

    /// One measure value per entity (e.g. orders per customer), in order of
    /// first occurrence
    pub fn per_entity(lines: &[EnrichedLine<'_>], entity: GroupKey, measure: Measure) -> Vec<f64> {
        Self::group_by(lines, &[entity])
            .iter()
            .map(|b| b.measure(measure))
            .collect()
    }

    /// Stable sort, largest measure first
    pub fn sort_by_measure_desc(buckets: &mut [Bucket], measure: Measure) {
        buckets.sort_by(|a, b| b.measure(measure).total_cmp(&a.measure(measure)));
    }

    /// Stable sort by an explicit rank (e.g. calendar position)
    pub fn sort_by_rank<F>(buckets: &mut [Bucket], rank: F)
    where
        F: Fn(&Bucket) -> usize,
    {
        buckets.sort_by_key(|b| rank(b));
    }
}
