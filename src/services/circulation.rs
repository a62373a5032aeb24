//! Circulation service: copies, lending, renewal and return

use chrono::NaiveDate;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::exists;
use crate::{
    error::{field_error, AppError, AppResult},
    models::{
        instance::{
            check_due_date, proposed_renewal_date, InstanceInput, InstanceView, LendForm,
            LoanStatus, RenewalForm, RenewalFormView,
        },
        listing::{Page, PageQuery, PageRequest, INSTANCE_LIST},
    },
    repository::{Circulation, InstanceFilter, Repository},
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn list(
        &self,
        filter: InstanceFilter,
        query: PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<InstanceView>> {
        let request = PageRequest::new(query, &INSTANCE_LIST)?;
        let page = self
            .repository
            .instances
            .list_instances(filter, request)
            .await?;
        request.check_in_range(page.total)?;
        Ok(page.map(|r| InstanceView::new(r, today)))
    }

    /// Every copy, due date order
    pub async fn list_instances(
        &self,
        query: PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<InstanceView>> {
        self.list(InstanceFilter::All, query, today).await
    }

    /// Every copy on loan, soonest due first
    pub async fn all_borrowed(
        &self,
        query: PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<InstanceView>> {
        self.list(InstanceFilter::OnLoan, query, today).await
    }

    /// Copies on loan to `user_id`, soonest due first
    pub async fn borrowed_by(
        &self,
        user_id: i32,
        query: PageQuery,
        today: NaiveDate,
    ) -> AppResult<Page<InstanceView>> {
        self.list(InstanceFilter::BorrowedBy(user_id), query, today)
            .await
    }

    pub async fn get_instance(&self, id: Uuid, today: NaiveDate) -> AppResult<InstanceView> {
        let record = self.repository.instances.get_instance(id).await?;
        Ok(InstanceView::new(record, today))
    }

    pub async fn instance_form(&self, id: Uuid) -> AppResult<InstanceInput> {
        Ok(self.repository.instances.get_instance(id).await?.instance.into())
    }

    pub async fn create_instance(
        &self,
        input: InstanceInput,
        today: NaiveDate,
    ) -> AppResult<InstanceView> {
        self.check_instance_input(&input).await?;

        let record = self.repository.instances.create_instance(&input).await?;
        tracing::info!(
            "Created copy {} of book {}",
            record.instance.id,
            record.instance.book_id
        );
        Ok(InstanceView::new(record, today))
    }

    pub async fn update_instance(
        &self,
        id: Uuid,
        input: InstanceInput,
        today: NaiveDate,
    ) -> AppResult<InstanceView> {
        self.repository.instances.get_instance(id).await?;
        self.check_instance_input(&input).await?;

        let record = self.repository.instances.update_instance(id, &input).await?;
        tracing::info!("Updated copy {} (status {})", id, record.instance.status);
        Ok(InstanceView::new(record, today))
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.instances.delete_instance(id).await?;
        tracing::info!("Deleted copy {}", id);
        Ok(())
    }

    async fn check_instance_input(&self, input: &InstanceInput) -> AppResult<()> {
        let mut errors = match input.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !exists(self.repository.books.get_book(input.book_id).await)? {
            errors.add(
                "book_id",
                field_error(
                    "does_not_exist",
                    format!("Book {} does not exist", input.book_id),
                ),
            );
        }

        if let Some(borrower_id) = input.borrower_id {
            self.check_borrower(borrower_id, &mut errors).await?;
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }

    async fn check_borrower(&self, borrower_id: i32, errors: &mut ValidationErrors) -> AppResult<()> {
        if !exists(self.repository.users.get_user(borrower_id).await)? {
            errors.add(
                "borrower_id",
                field_error(
                    "does_not_exist",
                    format!("User {} does not exist", borrower_id),
                ),
            );
        }
        Ok(())
    }

    // Workflows

    /// Renewal form with the default proposal of three weeks from today
    pub async fn renewal_form(&self, id: Uuid, today: NaiveDate) -> AppResult<RenewalFormView> {
        let record = self.repository.instances.get_instance(id).await?;
        Ok(RenewalFormView {
            instance: InstanceView::new(record, today),
            renewal_date: proposed_renewal_date(today),
        })
    }

    /// Set a new due date within `[today, today + 4 weeks]` on a copy that is on loan
    pub async fn renew(
        &self,
        id: Uuid,
        form: RenewalForm,
        today: NaiveDate,
    ) -> AppResult<InstanceView> {
        let current = self.repository.instances.get_instance(id).await?;
        if current.instance.status != LoanStatus::OnLoan {
            return Err(AppError::Conflict(format!(
                "Copy {} is not on loan ({})",
                id, current.instance.status
            )));
        }

        let due_back = form.clean(today).map_err(|errors| {
            tracing::warn!("Rejected renewal of {} to {}", id, form.renewal_date);
            AppError::InvalidInput(errors)
        })?;

        let record = self.repository.instances.set_due_back(id, due_back).await?;
        tracing::info!("Renewed copy {} until {}", id, due_back);
        Ok(InstanceView::new(record, today))
    }

    /// Lend a copy: on loan to `borrower_id`, due three weeks out unless given
    pub async fn lend(&self, id: Uuid, form: LendForm, today: NaiveDate) -> AppResult<InstanceView> {
        let current = self.repository.instances.get_instance(id).await?;
        if current.instance.status == LoanStatus::OnLoan {
            return Err(AppError::Conflict(format!("Copy {} is already on loan", id)));
        }

        let due_back = form.due_back.unwrap_or_else(|| proposed_renewal_date(today));
        let mut errors = match check_due_date("due_back", due_back, today) {
            Ok(_) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        self.check_borrower(form.borrower_id, &mut errors).await?;
        if !errors.errors().is_empty() {
            tracing::warn!("Rejected lending of {}", id);
            return Err(errors.into());
        }

        let record = self
            .repository
            .instances
            .set_circulation(
                id,
                Circulation {
                    status: LoanStatus::OnLoan,
                    due_back: Some(due_back),
                    borrower_id: Some(form.borrower_id),
                },
            )
            .await?;
        tracing::info!(
            "Lent copy {} to user {} until {}",
            id,
            form.borrower_id,
            due_back
        );
        Ok(InstanceView::new(record, today))
    }

    /// Mark a copy returned: available, no borrower, no due date
    pub async fn return_instance(&self, id: Uuid, today: NaiveDate) -> AppResult<InstanceView> {
        let record = self
            .repository
            .instances
            .set_circulation(
                id,
                Circulation {
                    status: LoanStatus::Available,
                    due_back: None,
                    borrower_id: None,
                },
            )
            .await?;
        tracing::info!("Copy {} returned", id);
        Ok(InstanceView::new(record, today))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::{book::BookInput, user::NewUser};

    struct Fixture {
        circulation: CirculationService,
        repository: Repository,
        book_id: i32,
        today: NaiveDate,
    }

    async fn fixture() -> Fixture {
        let repository = Repository::in_memory();
        let book = repository
            .books
            .create_book(&BookInput {
                title: "Dune".into(),
                summary: "Spice".into(),
                isbn: "9780441172719".into(),
                author_id: None,
                language_id: None,
                genre_ids: vec![],
            })
            .await
            .unwrap();

        Fixture {
            circulation: CirculationService::new(repository.clone()),
            repository,
            book_id: book.book.id,
            today: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        }
    }

    fn available(book_id: i32) -> InstanceInput {
        InstanceInput {
            book_id,
            imprint: "Ace, 1990".into(),
            status: LoanStatus::Available,
            due_back: None,
            borrower_id: None,
        }
    }

    fn on_loan(book_id: i32, borrower_id: i32, due_back: NaiveDate) -> InstanceInput {
        InstanceInput {
            status: LoanStatus::OnLoan,
            due_back: Some(due_back),
            borrower_id: Some(borrower_id),
            ..available(book_id)
        }
    }

    async fn patron(repository: &Repository) -> i32 {
        repository
            .users
            .create_user(&NewUser {
                username: "patron".into(),
                password_hash: None,
                permissions: vec![],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_renewal_sets_due_date_and_keeps_status() {
        let f = fixture().await;
        let borrower = patron(&f.repository).await;
        let copy = f
            .circulation
            .create_instance(on_loan(f.book_id, borrower, f.today), f.today)
            .await
            .unwrap();

        let form = f.circulation.renewal_form(copy.id, f.today).await.unwrap();
        assert_eq!(form.renewal_date, f.today + Duration::weeks(3));

        let renewed = f
            .circulation
            .renew(
                copy.id,
                RenewalForm {
                    renewal_date: f.today + Duration::days(28),
                },
                f.today,
            )
            .await
            .unwrap();
        assert_eq!(renewed.due_back, Some(f.today + Duration::days(28)));
        assert_eq!(renewed.status, LoanStatus::OnLoan);
        assert_eq!(renewed.borrower.map(|b| b.id), Some(borrower));
    }

    #[tokio::test]
    async fn test_renewal_outside_window_leaves_copy_untouched() {
        let f = fixture().await;
        let borrower = patron(&f.repository).await;
        let copy = f
            .circulation
            .create_instance(on_loan(f.book_id, borrower, f.today), f.today)
            .await
            .unwrap();

        for date in [f.today - Duration::days(1), f.today + Duration::days(29)] {
            let result = f
                .circulation
                .renew(copy.id, RenewalForm { renewal_date: date }, f.today)
                .await;
            assert!(matches!(result, Err(AppError::InvalidInput(_))));
        }

        let unchanged = f.circulation.get_instance(copy.id, f.today).await.unwrap();
        assert_eq!(unchanged.due_back, Some(f.today));
    }

    #[tokio::test]
    async fn test_renewal_of_copy_not_on_loan_is_a_conflict() {
        let f = fixture().await;
        let copy = f
            .circulation
            .create_instance(available(f.book_id), f.today)
            .await
            .unwrap();

        let result = f
            .circulation
            .renew(
                copy.id,
                RenewalForm {
                    renewal_date: f.today + Duration::days(5),
                },
                f.today,
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        let unchanged = f.circulation.get_instance(copy.id, f.today).await.unwrap();
        assert_eq!(unchanged.due_back, None);
        assert_eq!(unchanged.status, LoanStatus::Available);
    }

    #[tokio::test]
    async fn test_lend_then_return() {
        let f = fixture().await;
        let borrower = patron(&f.repository).await;
        let copy = f
            .circulation
            .create_instance(available(f.book_id), f.today)
            .await
            .unwrap();

        let lent = f
            .circulation
            .lend(
                copy.id,
                LendForm {
                    borrower_id: borrower,
                    due_back: None,
                },
                f.today,
            )
            .await
            .unwrap();
        assert_eq!(lent.status, LoanStatus::OnLoan);
        assert_eq!(lent.borrower.as_ref().map(|b| b.id), Some(borrower));
        assert_eq!(lent.due_back, Some(f.today + Duration::weeks(3)));

        let mine = f
            .circulation
            .borrowed_by(borrower, PageQuery::default(), f.today)
            .await
            .unwrap();
        assert_eq!(mine.total, 1);

        let returned = f.circulation.return_instance(copy.id, f.today).await.unwrap();
        assert_eq!(returned.status, LoanStatus::Available);
        assert!(returned.borrower.is_none());
        assert!(returned.due_back.is_none());

        let all = f
            .circulation
            .all_borrowed(PageQuery::default(), f.today)
            .await
            .unwrap();
        assert_eq!(all.total, 0);
    }

    #[tokio::test]
    async fn test_lend_to_unknown_borrower_is_a_field_error() {
        let f = fixture().await;
        let copy = f
            .circulation
            .create_instance(available(f.book_id), f.today)
            .await
            .unwrap();

        let err = f
            .circulation
            .lend(
                copy.id,
                LendForm {
                    borrower_id: 99,
                    due_back: None,
                },
                f.today,
            )
            .await
            .unwrap_err();
        let AppError::InvalidInput(errors) = err else {
            panic!("expected field errors");
        };
        assert!(errors.field_errors().contains_key("borrower_id"));
    }

    #[tokio::test]
    async fn test_copy_of_unknown_book_is_a_field_error() {
        let f = fixture().await;
        let err = f
            .circulation
            .create_instance(available(f.book_id + 1), f.today)
            .await
            .unwrap_err();
        let AppError::InvalidInput(errors) = err else {
            panic!("expected field errors");
        };
        assert!(errors.field_errors().contains_key("book_id"));
    }
}
