use crate::domain::owner::Owner;
use crate::domain::property::Property;

#[derive(Debug)]
pub struct OwnersPageData {
    pub owners: Vec<Owner>,
    /// Choices for the property assignment select.
    pub properties: Vec<Property>,
}
