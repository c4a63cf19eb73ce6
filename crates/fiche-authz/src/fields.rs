//! Static mapping between UI field names and backend field identifiers.
//!
//! # Purpose
//! The contact form speaks in UI names (`firstName`); `fiche_contact`
//! permission entries speak in backend ids (`fname`). This table is the only
//! link between the two vocabularies and ships as part of the engine.
//!
//! # Key invariants
//! - Each UI name maps to exactly one backend id and vice versa.
//! - A UI name absent from the table is "unmodeled": view fails open, edit
//!   fails closed (see the field gate).
//!
//! # Examples
//! ```rust
//! use fiche_authz::ContactField;
//!
//! let field = ContactField::from_ui_name("birthDate").expect("mapped");
//! assert_eq!(field.backend_id(), "birth_date");
//! assert!(ContactField::from_ui_name("favouriteColour").is_none());
//! ```

macro_rules! contact_fields {
    ($($variant:ident => $ui:literal, $backend:literal;)+) => {
        /// A contact-form field known to the permission model.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum ContactField {
            $($variant,)+
        }

        impl ContactField {
            pub const ALL: &'static [ContactField] = &[$(ContactField::$variant,)+];

            pub fn ui_name(self) -> &'static str {
                match self {
                    $(ContactField::$variant => $ui,)+
                }
            }

            pub fn backend_id(self) -> &'static str {
                match self {
                    $(ContactField::$variant => $backend,)+
                }
            }

            pub fn from_ui_name(name: &str) -> Option<Self> {
                match name.trim() {
                    $($ui => Some(ContactField::$variant),)+
                    _ => None,
                }
            }

            pub fn from_backend_id(id: &str) -> Option<Self> {
                match id.trim() {
                    $($backend => Some(ContactField::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

contact_fields! {
    Civility => "civility", "civility";
    FirstName => "firstName", "fname";
    LastName => "lastName", "lname";
    BirthDate => "birthDate", "birth_date";
    BirthPlace => "birthPlace", "birth_place";
    Nationality => "nationality", "nationality";
    Email => "email", "email";
    Phone => "phone", "phone";
    Mobile => "mobile", "mobile";
    Address => "address", "address";
    AddressComplement => "addressComplement", "address_complement";
    PostalCode => "postalCode", "postal_code";
    City => "city", "city";
    Country => "country", "country";
    Company => "company", "company";
    Profession => "profession", "profession";
    FamilySituation => "familySituation", "family_situation";
    ChildrenCount => "childrenCount", "nb_children";
    Campaign => "campaign", "campaign";
    Source => "source", "source";
    Teleoperator => "teleoperatorId", "teleoperator";
    Confirmateur => "confirmateurId", "confirmateur";
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ui_name())
    }
}
