//! Header mapping: physical spreadsheet headers → column indices, plus the
//! synonym tables that name each logical employee field.

use std::collections::HashMap;

/// A logical employee field that may appear under several header spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DocumentNumber,
    FullName,
    GivenName,
    Surname,
    DocumentType,
    Email,
    Phone,
    Address,
    Gender,
    Profile,
    BirthDate,
    Salary,
    HireDate,
    Status,
    EducationLevel,
    Position,
    Department,
}

impl Field {
    /// Accepted headers in lookup order, already normalised.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Field::DocumentNumber => &["documento", "numerodocumento", "documentnumber", "cedula"],
            Field::FullName => &["nombre", "nombrecompleto", "fullname", "name"],
            Field::GivenName => &["nombres", "primernombre", "firstname"],
            Field::Surname => &["apellidos", "apellido", "lastname", "surname"],
            Field::DocumentType => &["tipodocumento", "documenttype", "tipo"],
            Field::Email => &["email", "correo", "correoelectronico"],
            Field::Phone => &["telefono", "phone", "celular", "tel"],
            Field::Address => &["direccion", "address"],
            Field::Gender => &["genero", "gender", "sexo"],
            Field::Profile => &["perfil", "perfilprofesional", "profile", "professionalprofile"],
            Field::BirthDate => &["fechanacimiento", "birthdate", "nacimiento"],
            Field::Salary => &["salario", "salary", "sueldo"],
            Field::HireDate => &["fechaingreso", "hiredate", "ingreso", "fechacontratacion"],
            Field::Status => &["estado", "status"],
            Field::EducationLevel => &["niveleducativo", "educationlevel", "educacion", "education"],
            Field::Position => &["cargo", "position", "puesto"],
            Field::Department => &["departamento", "department", "area"],
        }
    }
}

/// Header groups that must each have at least one recognised column.
/// The name group accepts either a combined name or a given-name column.
pub const REQUIRED_HEADER_GROUPS: &[&[&str]] = &[
    &["documento", "numerodocumento", "documentnumber", "cedula"],
    &[
        "nombre",
        "nombrecompleto",
        "fullname",
        "name",
        "nombres",
        "primernombre",
        "firstname",
    ],
    &["cargo", "position", "puesto"],
    &["departamento", "department", "area"],
];

/// Lower-cases a header and drops all whitespace.
pub fn normalize_header(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    /// Builds the map from the header row. The first occurrence of a header wins.
    pub fn from_row(cells: &[String]) -> Self {
        let mut columns = HashMap::new();
        for (index, cell) in cells.iter().enumerate() {
            let key = normalize_header(cell);
            if !key.is_empty() {
                columns.entry(key).or_insert(index);
            }
        }
        Self { columns }
    }

    pub fn column(&self, header: &str) -> Option<usize> {
        self.columns.get(header).copied()
    }

    /// The first required group with no recognised header, if any.
    pub fn missing_group(&self) -> Option<&'static [&'static str]> {
        REQUIRED_HEADER_GROUPS
            .iter()
            .copied()
            .find(|group| !group.iter().any(|h| self.columns.contains_key(*h)))
    }

    /// Trimmed value of `field` in `row`. Synonyms are tried in order and a
    /// blank cell falls through to the next synonym.
    pub fn lookup<'r>(&self, row: &'r [String], field: Field) -> Option<&'r str> {
        field.synonyms().iter().find_map(|header| {
            let column = self.column(header)?;
            let value = row.get(column)?.trim();
            (!value.is_empty()).then_some(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_strips_spaces_and_case() {
        assert_eq!(normalize_header("  Numero Documento "), "numerodocumento");
        assert_eq!(normalize_header("FECHA\tINGRESO"), "fechaingreso");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let map = HeaderMap::from_row(&cells(&["Cargo", "Documento", "cargo"]));
        assert_eq!(map.column("cargo"), Some(0));
        assert_eq!(map.column("documento"), Some(1));
    }

    #[test]
    fn test_blank_headers_are_ignored() {
        let map = HeaderMap::from_row(&cells(&["", "  ", "Email"]));
        assert_eq!(map.column(""), None);
        assert_eq!(map.column("email"), Some(2));
    }

    #[test]
    fn test_lookup_prefers_earlier_synonym() {
        let map = HeaderMap::from_row(&cells(&["Cedula", "Documento"]));
        let row = cells(&["111", "222"]);
        assert_eq!(map.lookup(&row, Field::DocumentNumber), Some("222"));
    }

    #[test]
    fn test_lookup_falls_through_blank_cell() {
        let map = HeaderMap::from_row(&cells(&["Documento", "Cedula"]));
        let row = cells(&["   ", " 333 "]);
        assert_eq!(map.lookup(&row, Field::DocumentNumber), Some("333"));
    }

    #[test]
    fn test_lookup_short_row_is_absent() {
        let map = HeaderMap::from_row(&cells(&["Documento", "Cargo"]));
        let row = cells(&["1"]);
        assert_eq!(map.lookup(&row, Field::Position), None);
    }

    #[test]
    fn test_missing_group_reports_department() {
        let map = HeaderMap::from_row(&cells(&["Documento", "Nombre", "Cargo"]));
        let group = map.missing_group().unwrap();
        assert!(group.contains(&"departamento"));
    }

    #[test]
    fn test_split_name_satisfies_name_group() {
        let map = HeaderMap::from_row(&cells(&["Cedula", "First Name", "Puesto", "Area"]));
        assert!(map.missing_group().is_none());
    }

    #[test]
    fn test_empty_header_row_misses_document_group_first() {
        let map = HeaderMap::from_row(&[]);
        assert_eq!(map.missing_group(), Some(REQUIRED_HEADER_GROUPS[0]));
    }
}
