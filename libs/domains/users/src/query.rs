use std::collections::{BTreeMap, BTreeSet};

use crate::models::User;

/// Searchable user field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Criterion {
    Id,
    Email,
    FirstName,
    LastName,
    NickName,
    Country,
}

impl Criterion {
    fn value_of(self, user: &User) -> &str {
        match self {
            Criterion::Id => &user.id,
            Criterion::Email => &user.email,
            Criterion::FirstName => &user.first_name,
            Criterion::LastName => &user.last_name,
            Criterion::NickName => &user.nick_name,
            Criterion::Country => &user.country,
        }
    }
}

/// Accepted values per criterion.
///
/// A user matches when any criterion holds any of its values (OR across
/// criteria and values). An empty query matches nothing.
///
/// ```
/// use domain_users::UserQuery;
///
/// let query = UserQuery::new()
///     .by_email("ada@example.com")
///     .by_country("FR")
///     .by_country("UK");
/// assert!(!query.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    criteria: BTreeMap<Criterion, BTreeSet<String>>,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(mut self, criterion: Criterion, value: impl Into<String>) -> Self {
        self.criteria
            .entry(criterion)
            .or_default()
            .insert(value.into());
        self
    }

    pub fn by_all<I, V>(self, criterion: Criterion, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        values
            .into_iter()
            .fold(self, |query, value| query.by(criterion, value))
    }

    pub fn by_id(self, id: impl Into<String>) -> Self {
        self.by(Criterion::Id, id)
    }

    pub fn by_email(self, email: impl Into<String>) -> Self {
        self.by(Criterion::Email, email)
    }

    pub fn by_first_name(self, first_name: impl Into<String>) -> Self {
        self.by(Criterion::FirstName, first_name)
    }

    pub fn by_last_name(self, last_name: impl Into<String>) -> Self {
        self.by(Criterion::LastName, last_name)
    }

    pub fn by_nick_name(self, nick_name: impl Into<String>) -> Self {
        self.by(Criterion::NickName, nick_name)
    }

    pub fn by_country(self, country: impl Into<String>) -> Self {
        self.by(Criterion::Country, country)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.values().all(BTreeSet::is_empty)
    }

    /// Values accepted for `criterion`
    pub fn values(&self, criterion: Criterion) -> impl Iterator<Item = &str> {
        self.criteria
            .get(&criterion)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn matches(&self, user: &User) -> bool {
        self.criteria
            .iter()
            .any(|(criterion, values)| values.contains(criterion.value_of(user)))
    }
}
