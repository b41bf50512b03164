use crate::domain::service_person::ServicePerson;

#[derive(Debug)]
pub struct PersonnelPageData {
    /// Active and inactive crew, ordered by name.
    pub people: Vec<ServicePerson>,
}
