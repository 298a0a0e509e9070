// SPDX-License-Identifier: MPL-2.0
//! The application update loop: component event handling, remote calls, and
//! reconciliation of their results.

use super::{App, Message, Screen};
use crate::api::{ApiError, ImageRecord};
use crate::gallery::{cache, Collection};
use crate::ui::auth::{forgot_password, login, reset_password, signup};
use crate::ui::gallery;
use crate::ui::notifications::Notification;
use iced::Task;
use std::path::PathBuf;
use std::time::Duration;

impl App {
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Login(msg) => self.on_login(msg),
            Message::Signup(msg) => self.on_signup(msg),
            Message::ForgotPassword(msg) => self.on_forgot_password(msg),
            Message::ResetPassword(msg) => self.on_reset_password(msg),
            Message::Gallery(msg) => self.on_gallery(msg),

            Message::Notification(msg) => {
                self.notifications.handle_message(&msg);
                Task::none()
            }
            Message::Tick(_) => {
                self.notifications.tick();
                Task::none()
            }

            Message::LoginCompleted(result) => self.on_login_completed(result),
            Message::RegisterCompleted(result) => self.on_register_completed(result),
            Message::ResetRequested(result) => self.on_reset_requested(result),
            Message::ResetConfirmed(result) => self.on_reset_confirmed(result),

            Message::UsernameDebounceElapsed { generation } => {
                match self.signup.username_check_due(generation) {
                    Some(username) => {
                        let client = self.client.clone();
                        Task::perform(
                            async move { client.validate_username(&username).await },
                            move |result| Message::UsernameChecked { generation, result },
                        )
                    }
                    None => Task::none(),
                }
            }
            Message::PasswordDebounceElapsed { generation } => {
                match self.signup.password_check_due(generation) {
                    Some(password) => {
                        let client = self.client.clone();
                        Task::perform(
                            async move { client.validate_password(&password).await },
                            move |result| Message::PasswordChecked { generation, result },
                        )
                    }
                    None => Task::none(),
                }
            }
            Message::UsernameChecked { generation, result } => {
                self.signup.apply_username_check(generation, result);
                Task::none()
            }
            Message::PasswordChecked { generation, result } => {
                self.signup.apply_password_check(generation, result);
                Task::none()
            }

            Message::ImagesFetched(result) => self.on_images_fetched(result),
            Message::ImageUploaded(result) => self.on_image_uploaded(result),
            Message::OrderPersisted(result) => self.on_order_persisted(result),
            Message::ImageDeleted { id, result } => self.on_image_deleted(id, result),
            Message::ImageEdited { id, result } => self.on_image_edited(id, result),
            Message::ThumbnailFetched { id, result } => {
                self.pending_thumbnails.remove(&id);
                match result {
                    Ok(bytes) => {
                        if let Some(handle) = cache::decode_thumbnail(&bytes) {
                            self.thumbnails.insert(id, handle);
                        }
                    }
                    Err(error) => {
                        log::warn!("thumbnail download for record {} failed: {}", id, error);
                    }
                }
                Task::none()
            }

            Message::UploadFilesPicked(paths) => match paths {
                Some(paths) => self.upload_files(paths),
                None => Task::none(),
            },
            Message::ReplacementPicked(path) => {
                if let Some(path) = path {
                    self.gallery.set_replacement(path);
                }
                Task::none()
            }
            Message::FileDropped(path) => {
                if self.screen == Screen::Gallery {
                    self.upload_files(vec![path])
                } else {
                    Task::none()
                }
            }
        }
    }

    // --- auth screens -------------------------------------------------------

    fn on_login(&mut self, message: login::Message) -> Task<Message> {
        match self.login.update(message) {
            login::Event::None => Task::none(),
            login::Event::Submit { username, password } => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.login(&username, &password).await.map(|_| ()) },
                    Message::LoginCompleted,
                )
            }
            login::Event::NavigateSignup => {
                self.signup = signup::State::new();
                self.screen = Screen::Signup;
                Task::none()
            }
            login::Event::NavigateForgotPassword => {
                self.forgot_password = forgot_password::State::new();
                self.screen = Screen::ForgotPassword;
                Task::none()
            }
        }
    }

    fn on_login_completed(&mut self, result: Result<(), ApiError>) -> Task<Message> {
        match result {
            Ok(()) => {
                self.login = login::State::new();
                self.screen = Screen::Gallery;
                self.fetch_images()
            }
            Err(error) => {
                self.login.submit_failed(&error);
                self.push_error_toast(&error, "error-unexpected");
                Task::none()
            }
        }
    }

    fn on_signup(&mut self, message: signup::Message) -> Task<Message> {
        match self.signup.update(message) {
            signup::Event::None => Task::none(),
            signup::Event::ScheduleUsernameCheck { generation } => Task::perform(
                tokio::time::sleep(Duration::from_millis(signup::DEBOUNCE_MS)),
                move |_| Message::UsernameDebounceElapsed { generation },
            ),
            signup::Event::SchedulePasswordCheck { generation } => Task::perform(
                tokio::time::sleep(Duration::from_millis(signup::DEBOUNCE_MS)),
                move |_| Message::PasswordDebounceElapsed { generation },
            ),
            signup::Event::Submit(request) => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.register(&request).await },
                    Message::RegisterCompleted,
                )
            }
            signup::Event::NavigateLogin => {
                self.login = login::State::new();
                self.screen = Screen::Login;
                Task::none()
            }
        }
    }

    fn on_register_completed(&mut self, result: Result<(), ApiError>) -> Task<Message> {
        match result {
            Ok(()) => {
                self.signup = signup::State::new();
                self.login = login::State::new();
                self.screen = Screen::Login;
                self.notifications
                    .push(Notification::success("toast-verification-sent"));
            }
            Err(error) => {
                self.signup.submit_failed(&error);
                self.push_error_toast(&error, "toast-register-failed");
            }
        }
        Task::none()
    }

    fn on_forgot_password(&mut self, message: forgot_password::Message) -> Task<Message> {
        match self.forgot_password.update(message) {
            forgot_password::Event::None => Task::none(),
            forgot_password::Event::Submit { email } => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.request_password_reset(&email).await },
                    Message::ResetRequested,
                )
            }
            forgot_password::Event::NavigateLogin => {
                self.login = login::State::new();
                self.screen = Screen::Login;
                Task::none()
            }
            forgot_password::Event::NavigateSignup => {
                self.signup = signup::State::new();
                self.screen = Screen::Signup;
                Task::none()
            }
            forgot_password::Event::NavigateReset => {
                self.reset_password = reset_password::State::new();
                self.screen = Screen::ResetPassword;
                Task::none()
            }
        }
    }

    fn on_reset_requested(&mut self, result: Result<(), ApiError>) -> Task<Message> {
        match result {
            Ok(()) => {
                self.forgot_password = forgot_password::State::new();
                self.login = login::State::new();
                self.screen = Screen::Login;
                self.notifications
                    .push(Notification::success("toast-reset-email-sent"));
            }
            Err(error) => {
                self.forgot_password.submit_failed(&error);
                self.push_error_toast(&error, "error-unexpected");
            }
        }
        Task::none()
    }

    fn on_reset_password(&mut self, message: reset_password::Message) -> Task<Message> {
        match self.reset_password.update(message) {
            reset_password::Event::None => Task::none(),
            reset_password::Event::Submit(request) => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.confirm_password_reset(&request).await },
                    Message::ResetConfirmed,
                )
            }
            reset_password::Event::NavigateLogin => {
                self.login = login::State::new();
                self.screen = Screen::Login;
                Task::none()
            }
        }
    }

    fn on_reset_confirmed(&mut self, result: Result<(), ApiError>) -> Task<Message> {
        match result {
            Ok(()) => {
                self.reset_password = reset_password::State::new();
                self.login = login::State::new();
                self.screen = Screen::Login;
                self.notifications
                    .push(Notification::success("toast-password-changed"));
            }
            Err(error) => {
                self.reset_password.submit_failed(&error);
                self.push_error_toast(&error, "error-unexpected");
            }
        }
        Task::none()
    }

    // --- gallery ------------------------------------------------------------

    fn on_gallery(&mut self, message: gallery::Message) -> Task<Message> {
        match self.gallery.update(message) {
            gallery::Event::None => Task::none(),
            gallery::Event::MoveImage { id, new_order } => {
                // Optimistic: the collection mutates now, the PATCH follows.
                if !self.collection.begin_move(id, new_order) {
                    return Task::none();
                }
                let client = self.client.clone();
                Task::perform(
                    async move { client.update_image_order(id, new_order).await },
                    Message::OrderPersisted,
                )
            }
            gallery::Event::PickUploadFiles => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                        .pick_files()
                        .await
                        .map(|files| {
                            files
                                .into_iter()
                                .map(|file| file.path().to_path_buf())
                                .collect()
                        })
                },
                Message::UploadFilesPicked,
            ),
            gallery::Event::PickReplacement => Task::perform(
                async {
                    rfd::AsyncFileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                        .pick_file()
                        .await
                        .map(|file| file.path().to_path_buf())
                },
                Message::ReplacementPicked,
            ),
            gallery::Event::SaveEdit {
                id,
                title,
                replacement,
            } => {
                let client = self.client.clone();
                Task::perform(
                    async move {
                        let replacement = match replacement {
                            Some(path) => Some(read_upload(&path).await?),
                            None => None,
                        };
                        client.update_image(id, title, replacement).await
                    },
                    move |result| Message::ImageEdited { id, result },
                )
            }
            gallery::Event::Delete { id } => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.delete_image(id).await },
                    move |result| Message::ImageDeleted { id, result },
                )
            }
            gallery::Event::Refresh => self.fetch_images(),
            gallery::Event::Logout => {
                self.client.logout();
                self.reset_gallery_state();
                self.screen = Screen::Login;
                self.login = login::State::new();
                self.notifications.push(Notification::info("toast-logged-out"));
                Task::none()
            }
        }
    }

    fn on_images_fetched(&mut self, result: Result<Vec<ImageRecord>, ApiError>) -> Task<Message> {
        match result {
            Ok(records) => {
                self.collection.load_succeeded(records);
                self.fetch_missing_thumbnails()
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.expire_session();
                } else {
                    self.collection.load_failed(error.to_string());
                    self.push_error_toast(&error, "toast-load-failed");
                }
                Task::none()
            }
        }
    }

    fn on_image_uploaded(&mut self, result: Result<ImageRecord, ApiError>) -> Task<Message> {
        match result {
            Ok(record) => {
                self.collection.add_succeeded(record);
                self.notifications
                    .push(Notification::success("toast-upload-complete"));
                self.fetch_missing_thumbnails()
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.expire_session();
                } else {
                    self.push_error_toast(&error, "toast-upload-failed");
                }
                Task::none()
            }
        }
    }

    fn on_order_persisted(&mut self, result: Result<ImageRecord, ApiError>) -> Task<Message> {
        match result {
            Ok(record) => {
                self.collection.confirm_move(record.id, record.order);
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.expire_session();
                } else {
                    self.collection.fail_move(error.to_string());
                    self.push_error_toast(&error, "toast-reorder-failed");
                }
            }
        }
        Task::none()
    }

    fn on_image_deleted(&mut self, id: i64, result: Result<(), ApiError>) -> Task<Message> {
        match result {
            Ok(()) => {
                self.collection.remove_succeeded(id);
                self.thumbnails.invalidate(id);
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.expire_session();
                } else {
                    self.push_error_toast(&error, "toast-delete-failed");
                }
            }
        }
        Task::none()
    }

    fn on_image_edited(&mut self, id: i64, result: Result<ImageRecord, ApiError>) -> Task<Message> {
        match result {
            Ok(record) => {
                self.collection.edit_succeeded(record);
                // The content may have been replaced; re-fetch lazily.
                self.thumbnails.invalidate(id);
                self.notifications
                    .push(Notification::success("toast-edit-saved"));
                self.fetch_missing_thumbnails()
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.expire_session();
                } else {
                    self.push_error_toast(&error, "toast-edit-failed");
                }
                Task::none()
            }
        }
    }

    // --- helpers ------------------------------------------------------------

    pub(super) fn fetch_images(&mut self) -> Task<Message> {
        self.collection.begin_load();
        let client = self.client.clone();
        Task::perform(
            async move { client.list_images().await },
            Message::ImagesFetched,
        )
    }

    /// Starts downloads for every record without a cached or in-flight
    /// thumbnail.
    fn fetch_missing_thumbnails(&mut self) -> Task<Message> {
        let mut tasks = Vec::new();
        for record in self.collection.records() {
            let id = record.id;
            if self.thumbnails.contains(id) || self.pending_thumbnails.contains(&id) {
                continue;
            }
            self.pending_thumbnails.insert(id);

            let client = self.client.clone();
            let url = record.image.clone();
            tasks.push(Task::perform(
                async move { client.fetch_bytes(&url).await },
                move |result| Message::ThumbnailFetched { id, result },
            ));
        }
        Task::batch(tasks)
    }

    /// Uploads each picked file, appending after the current tail of the
    /// collection.
    fn upload_files(&mut self, paths: Vec<PathBuf>) -> Task<Message> {
        let base_order = self.collection.next_order();
        let tasks: Vec<Task<Message>> = paths
            .into_iter()
            .enumerate()
            .map(|(offset, path)| {
                let client = self.client.clone();
                let order = base_order + offset as i64;
                Task::perform(
                    async move {
                        let (file_name, bytes) = read_upload(&path).await?;
                        let title = file_name.clone();
                        client.create_image(title, file_name, bytes, order).await
                    },
                    Message::ImageUploaded,
                )
            })
            .collect();
        Task::batch(tasks)
    }

    /// Shows the server's own message when it sent one, the fallback key
    /// otherwise.
    fn push_error_toast(&mut self, error: &ApiError, fallback_key: &'static str) {
        match error.first_message() {
            Some(detail) => self.notifications.push(
                Notification::error("toast-server-message").with_arg("detail", detail),
            ),
            None => self.notifications.push(Notification::error(fallback_key)),
        }
    }

    /// Drops the stored session and returns to the login screen. Used when
    /// the service answers 401 to any gallery call.
    fn expire_session(&mut self) {
        self.client.logout();
        self.reset_gallery_state();
        self.screen = Screen::Login;
        self.login = login::State::new();
        self.notifications
            .push(Notification::warning("toast-session-expired"));
    }

    fn reset_gallery_state(&mut self) {
        self.collection = Collection::new();
        self.thumbnails.clear();
        self.pending_thumbnails.clear();
        self.gallery = gallery::State::new();
    }
}

/// Reads a file picked (or dropped) for upload, yielding its name and bytes.
async fn read_upload(path: &PathBuf) -> Result<(String, Vec<u8>), ApiError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::Transport(format!("failed to read {}: {}", path.display(), e)))?;
    Ok((file_name, bytes))
}
