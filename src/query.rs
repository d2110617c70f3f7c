//! Search filters and their OData query-string translation.
//!
//! [`SearchFilter`] collects the optional search criteria for a client
//! lookup; [`SearchFilter::to_query_string`] translates them into the OData
//! fragment the server expects. The translation is pure and stateless.

/// The fixed expansion requested when related data is included.
const RELATED_EXPANSION: &str = "Phones,ClientPatientRelationships/Patient";

/// Search criteria for a client lookup.
///
/// Every field is optional; absent fields emit no clause at all. Substring
/// fields match with OData `contains()` semantics server-side.
///
/// # Examples
///
/// ```
/// use vetdata_client::SearchFilter;
///
/// let filter = SearchFilter::new()
///     .last_name("Smith")
///     .include_related(true)
///     .take(10);
///
/// assert_eq!(
///     filter.to_query_string(),
///     "?$filter=contains(LastName,'Smith')\
///      &$expand=Phones,ClientPatientRelationships/Patient&$top=10"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    include_related: bool,
    skip: Option<u32>,
    take: Option<u32>,
}

impl SearchFilter {
    /// Creates an empty filter matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches clients whose last name contains `value`.
    pub fn last_name(mut self, value: impl Into<String>) -> Self {
        self.last_name = Some(value.into());
        self
    }

    /// Matches clients with an email address containing `value`.
    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Matches clients with a phone number containing `value`.
    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    /// Expands related phone and patient data in the results.
    pub fn include_related(mut self, include: bool) -> Self {
        self.include_related = include;
        self
    }

    /// Skips the first `n` matches (pagination offset).
    pub fn skip(mut self, n: u32) -> Self {
        self.skip = Some(n);
        self
    }

    /// Limits the result to at most `n` matches (pagination size).
    pub fn take(mut self, n: u32) -> Self {
        self.take = Some(n);
        self
    }

    /// Builds the OData query-string fragment for this filter.
    ///
    /// Clause order is fixed: `$filter`, `$expand`, `$skip`, `$top`. The
    /// fragment starts with `?` when any clause exists and is empty
    /// otherwise. Empty-string criteria are treated as absent.
    ///
    /// Filter values are embedded verbatim, mirroring the upstream API's
    /// reference behavior: a value containing a single quote will break the
    /// generated predicate. Do not pass untrusted input.
    pub fn to_query_string(&self) -> String {
        let mut filters = Vec::new();

        if let Some(last_name) = present(&self.last_name) {
            filters.push(format!("contains(LastName,'{last_name}')"));
        }
        if let Some(email) = present(&self.email) {
            filters.push(format!("Emails/any(e: contains(e.Address,'{email}'))"));
        }
        if let Some(phone) = present(&self.phone) {
            filters.push(format!("Phones/any(p: contains(p.PhoneNumber,'{phone}'))"));
        }

        let mut parts = Vec::new();

        if !filters.is_empty() {
            parts.push(format!("$filter={}", filters.join(" and ")));
        }
        if self.include_related {
            parts.push(format!("$expand={RELATED_EXPANSION}"));
        }
        if let Some(skip) = self.skip {
            parts.push(format!("$skip={skip}"));
        }
        if let Some(take) = self.take {
            parts.push(format!("$top={take}"));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

/// Treats `None` and empty strings alike: neither emits a clause.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_builds_empty_string() {
        assert_eq!(SearchFilter::new().to_query_string(), "");
    }

    #[test]
    fn empty_string_fields_are_treated_as_absent() {
        let filter = SearchFilter::new().last_name("").email("").phone("");
        assert_eq!(filter.to_query_string(), "");
    }

    #[test]
    fn single_last_name_filter() {
        let filter = SearchFilter::new().last_name("Smith");
        assert_eq!(
            filter.to_query_string(),
            "?$filter=contains(LastName,'Smith')"
        );
    }

    #[test]
    fn multiple_filters_join_with_and() {
        let filter = SearchFilter::new()
            .last_name("Smith")
            .email("smith@example.com");
        assert_eq!(
            filter.to_query_string(),
            "?$filter=contains(LastName,'Smith') and \
             Emails/any(e: contains(e.Address,'smith@example.com'))"
        );
    }

    #[test]
    fn phone_filter_emits_any_clause() {
        let filter = SearchFilter::new().phone("555-0100");
        assert_eq!(
            filter.to_query_string(),
            "?$filter=Phones/any(p: contains(p.PhoneNumber,'555-0100'))"
        );
    }

    #[test]
    fn clause_order_is_filter_expand_skip_top() {
        let filter = SearchFilter::new()
            .take(10)
            .skip(20)
            .include_related(true)
            .last_name("Smith");
        assert_eq!(
            filter.to_query_string(),
            "?$filter=contains(LastName,'Smith')\
             &$expand=Phones,ClientPatientRelationships/Patient\
             &$skip=20&$top=10"
        );
    }

    #[test]
    fn pagination_without_filters() {
        let filter = SearchFilter::new().skip(5).take(5);
        assert_eq!(filter.to_query_string(), "?$skip=5&$top=5");
    }

    #[test]
    fn expansion_alone() {
        let filter = SearchFilter::new().include_related(true);
        assert_eq!(
            filter.to_query_string(),
            "?$expand=Phones,ClientPatientRelationships/Patient"
        );
    }

    #[test]
    fn values_are_embedded_verbatim() {
        let filter = SearchFilter::new().last_name("O'Brien");
        assert_eq!(
            filter.to_query_string(),
            "?$filter=contains(LastName,'O'Brien')"
        );
    }
}
