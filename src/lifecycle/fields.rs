use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{db::entities::employee, error::AppError};

/// Payroll columns. Written only by actors holding the payroll capability
/// and hidden from everyone else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PayrollFields {
    pub currency_id: Option<Uuid>,
    pub salary: Option<String>,
    pub salary_period: Option<String>,
    pub pay_frequency_id: Option<Uuid>,
    pub net_salary: Option<String>,
    pub change_reason: Option<String>,
    pub increase_percentage: Option<String>,
    pub employment_type_id: Option<Uuid>,
    pub working_hours: Option<String>,
}

/// Editable employee data as submitted by the onboarding and edit forms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeFields {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub country_of_origin: Option<String>,
    pub working_country: Option<String>,
    pub personal_email: Option<String>,
    pub company_email: Option<String>,
    pub job_title: Option<String>,
    pub direct_manager: Option<String>,
    pub site_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub employer_id: Option<Uuid>,
    pub hr_team_id: Option<Uuid>,
    pub employment_contract_id: Option<Uuid>,
    pub business_unit: Option<String>,
    pub business_vertical: Option<String>,
    pub brand_code: Option<String>,
    pub product_code: Option<String>,
    pub supplier: Option<String>,
    pub entity_to_be_billed: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub payroll: PayrollFields,
}

impl EmployeeFields {
    /// Trims text, lower-cases the email, blanks empty optionals and fills
    /// in `full_name`.
    pub fn normalize(&mut self) -> Result<(), AppError> {
        self.email = self.email.trim().to_lowercase();
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();

        if self.email.is_empty() || !self.email.contains('@') {
            return Err(AppError::bad_request("A valid email is required"));
        }
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return Err(AppError::bad_request("First name and last name are required"));
        }

        for value in [
            &mut self.full_name,
            &mut self.gender,
            &mut self.nationality,
            &mut self.country_of_origin,
            &mut self.working_country,
            &mut self.personal_email,
            &mut self.company_email,
            &mut self.job_title,
            &mut self.direct_manager,
            &mut self.business_unit,
            &mut self.business_vertical,
            &mut self.brand_code,
            &mut self.product_code,
            &mut self.supplier,
            &mut self.entity_to_be_billed,
            &mut self.payroll.salary,
            &mut self.payroll.salary_period,
            &mut self.payroll.net_salary,
            &mut self.payroll.change_reason,
            &mut self.payroll.increase_percentage,
            &mut self.payroll.working_hours,
        ] {
            blank_to_none(value);
        }

        if self.full_name.is_none() {
            self.full_name = Some(format!("{} {}", self.first_name, self.last_name));
        }
        Ok(())
    }

    /// Copies every non-payroll field onto `active`, and the payroll fields
    /// too when `include_payroll` is set. Call `normalize` first.
    pub fn apply_to(self, active: &mut employee::ActiveModel, include_payroll: bool) {
        let full_name = self
            .full_name
            .unwrap_or_else(|| format!("{} {}", self.first_name, self.last_name));

        active.email = Set(self.email);
        active.first_name = Set(self.first_name);
        active.last_name = Set(self.last_name);
        active.search_name = Set(full_name.to_lowercase());
        active.full_name = Set(full_name);
        active.gender = Set(self.gender);
        active.date_of_birth = Set(self.date_of_birth);
        active.nationality = Set(self.nationality);
        active.country_of_origin = Set(self.country_of_origin);
        active.working_country = Set(self.working_country);
        active.personal_email = Set(self.personal_email);
        active.company_email = Set(self.company_email);
        active.job_title = Set(self.job_title);
        active.direct_manager = Set(self.direct_manager);
        active.site_id = Set(self.site_id);
        active.department_id = Set(self.department_id);
        active.employer_id = Set(self.employer_id);
        active.hr_team_id = Set(self.hr_team_id);
        active.employment_contract_id = Set(self.employment_contract_id);
        active.business_unit = Set(self.business_unit);
        active.business_vertical = Set(self.business_vertical);
        active.brand_code = Set(self.brand_code);
        active.product_code = Set(self.product_code);
        active.supplier = Set(self.supplier);
        active.entity_to_be_billed = Set(self.entity_to_be_billed);
        active.start_date = Set(self.start_date);
        active.end_date = Set(self.end_date);

        if include_payroll {
            let payroll = self.payroll;
            active.currency_id = Set(payroll.currency_id);
            active.salary = Set(payroll.salary);
            active.salary_period = Set(payroll.salary_period);
            active.pay_frequency_id = Set(payroll.pay_frequency_id);
            active.net_salary = Set(payroll.net_salary);
            active.change_reason = Set(payroll.change_reason);
            active.increase_percentage = Set(payroll.increase_percentage);
            active.employment_type_id = Set(payroll.employment_type_id);
            active.working_hours = Set(payroll.working_hours);
        }
    }
}

/// Clears the payroll columns of a row about to be shown to a reader
/// without the payroll capability.
pub fn redact_payroll(mut employee: employee::Model) -> employee::Model {
    employee.currency_id = None;
    employee.salary = None;
    employee.salary_period = None;
    employee.pay_frequency_id = None;
    employee.net_salary = None;
    employee.change_reason = None;
    employee.increase_percentage = None;
    employee.employment_type_id = None;
    employee.working_hours = None;
    employee
}

fn blank_to_none(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
}

#[cfg(test)]
mod tests {
    use sea_orm::ActiveValue;

    use super::{EmployeeFields, PayrollFields, redact_payroll};
    use crate::{
        db::entities::employee, error::AppError,
        notifications::template::tests::employee_fixture,
    };

    fn fields() -> EmployeeFields {
        EmployeeFields {
            email: "  Ana@Co.COM ".to_string(),
            first_name: " Ana ".to_string(),
            last_name: "Silva".to_string(),
            job_title: Some("   ".to_string()),
            payroll: PayrollFields {
                salary: Some("50000".to_string()),
                ..PayrollFields::default()
            },
            ..EmployeeFields::default()
        }
    }

    #[test]
    fn normalize_cleans_input_and_derives_full_name() {
        let mut fields = fields();
        fields.normalize().expect("fields should be valid");

        assert_eq!(fields.email, "ana@co.com");
        assert_eq!(fields.first_name, "Ana");
        assert_eq!(fields.full_name.as_deref(), Some("Ana Silva"));
        assert!(fields.job_title.is_none());
    }

    #[test]
    fn normalize_requires_email_and_names() {
        let mut missing_email = fields();
        missing_email.email = "not-an-email".to_string();
        assert!(matches!(
            missing_email.normalize(),
            Err(AppError::BadRequest(_))
        ));

        let mut missing_name = fields();
        missing_name.last_name = " ".to_string();
        assert!(missing_name.normalize().is_err());
    }

    #[test]
    fn payroll_is_left_unset_without_the_capability() {
        let mut fields = fields();
        fields.normalize().expect("fields should be valid");
        let mut active = employee::ActiveModel::default();
        fields.apply_to(&mut active, false);

        assert!(matches!(active.salary, ActiveValue::NotSet));
        assert!(matches!(&active.search_name, ActiveValue::Set(name) if name == "ana silva"));
    }

    #[test]
    fn payroll_is_written_with_the_capability() {
        let mut fields = fields();
        fields.normalize().expect("fields should be valid");
        let mut active = employee::ActiveModel::default();
        fields.apply_to(&mut active, true);

        assert!(matches!(
            &active.salary,
            ActiveValue::Set(Some(salary)) if salary == "50000"
        ));
    }

    #[test]
    fn flat_json_fills_payroll_fields() {
        let fields: EmployeeFields = serde_json::from_value(serde_json::json!({
            "email": "ana@co.com",
            "first_name": "Ana",
            "last_name": "Silva",
            "salary": "60000",
            "start_date": "2024-01-15"
        }))
        .expect("fields should deserialize");

        assert_eq!(fields.payroll.salary.as_deref(), Some("60000"));
        assert!(fields.start_date.is_some());
    }

    #[test]
    fn redaction_clears_only_payroll() {
        let mut employee = employee_fixture();
        employee.salary = Some("50000".to_string());
        let redacted = redact_payroll(employee);

        assert!(redacted.salary.is_none());
        assert_eq!(redacted.job_title.as_deref(), Some("Analyst"));
    }
}
