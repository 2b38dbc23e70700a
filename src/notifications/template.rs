use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::db::entities::employee;

const NO_TEAM: &str = "No Team Assigned";
const NO_DATE: &str = "Not Set";
const NO_VALUE: &str = "N/A";

/// Display names of the reference rows an employee points at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelatedLookups {
    pub current_employer: Option<String>,
    pub employment_contract: Option<String>,
    pub employment_type: Option<String>,
    pub site: Option<String>,
    pub hr_department: Option<String>,
    pub department: Option<String>,
}

impl RelatedLookups {
    /// Reference ids the renderer may need for `employee`.
    pub fn ids_for(employee: &employee::Model) -> Vec<Uuid> {
        [
            employee.employer_id,
            employee.employment_contract_id,
            employee.employment_type_id,
            employee.site_id,
            employee.hr_team_id,
            employee.department_id,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn resolve(employee: &employee::Model, names: &HashMap<Uuid, String>) -> Self {
        let name = |id: Option<Uuid>| id.and_then(|id| names.get(&id).cloned());
        Self {
            current_employer: name(employee.employer_id),
            employment_contract: name(employee.employment_contract_id),
            employment_type: name(employee.employment_type_id),
            site: name(employee.site_id),
            hr_department: name(employee.hr_team_id),
            department: name(employee.department_id),
        }
    }
}

/// Substitutes `{tag}` placeholders in one pass. Unknown tags and stray
/// braces are copied through unchanged.
pub fn render(text: &str, employee: &employee::Model, lookups: &RelatedLookups) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];

        match tail.find(['{', '}']) {
            Some(close) if tail.as_bytes()[close] == b'}' => {
                let name = &tail[..close];
                match resolve_tag(name, employee, lookups) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &tail[close + 1..];
            }
            _ => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve_tag(
    name: &str,
    employee: &employee::Model,
    lookups: &RelatedLookups,
) -> Option<String> {
    let value = match name {
        "first_name" => text(Some(&employee.first_name)),
        "full_name" => text(Some(&employee.full_name)),
        "start_date" => date(employee.start_date),
        "end_date" => date(employee.end_date),
        "company_email" => text(employee.company_email.as_deref()),
        "job_title" => text(employee.job_title.as_deref()),
        "current_employer" => text(lookups.current_employer.as_deref()),
        "direct_manager" => text(employee.direct_manager.as_deref()),
        "employment_contract" => text(lookups.employment_contract.as_deref()),
        "employment_type" => text(lookups.employment_type.as_deref()),
        "site" => text(lookups.site.as_deref()),
        "hr_department" => lookups
            .hr_department
            .clone()
            .filter(|team| !team.trim().is_empty())
            .unwrap_or_else(|| NO_TEAM.to_string()),
        "business_unit" => text(employee.business_unit.as_deref()),
        "business_vertical" => text(employee.business_vertical.as_deref()),
        "brand_code" => text(employee.brand_code.as_deref()),
        "product_code" => text(employee.product_code.as_deref()),
        "department" => text(lookups.department.as_deref()),
        _ => return None,
    };
    Some(value)
}

fn text(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(NO_VALUE)
        .to_string()
}

fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| NO_DATE.to_string())
}
