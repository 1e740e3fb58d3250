use async_trait::async_trait;
use carebook_storage::{
    Appointment, AppointmentStatus, AppointmentStorage, Message, MessageStorage, NewAppointment,
    NewMessage, NewUser, Role, StorageError, StorageResult, User, UserStorage,
};
use papaya::HashMap as PapayaHashMap;
use uuid::Uuid;

const USERS: &str = "users";
const MESSAGES: &str = "messages";
const APPOINTMENTS: &str = "appointments";

/// In-memory storage backend using papaya lock-free HashMaps.
///
/// Email uniqueness is enforced through a separate email → id index whose
/// insert is atomic, so concurrent creates with the same email cannot both win.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    users: PapayaHashMap<Uuid, User>,
    email_index: PapayaHashMap<String, Uuid>,
    messages: PapayaHashMap<Uuid, Message>,
    appointments: PapayaHashMap<Uuid, Appointment>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.pin().len()
    }
}

/// Collects into creation order (unix nanos, then id).
fn sorted_by_creation<T: Clone>(
    items: impl Iterator<Item = T>,
    key: impl Fn(&T) -> (i128, Uuid),
) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl UserStorage for InMemoryStorage {
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self.users.pin().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let index = self.email_index.pin();
        let Some(id) = index.get(email) else {
            return Ok(None);
        };
        Ok(self.users.pin().get(id).cloned())
    }

    async fn create(&self, user: NewUser) -> StorageResult<User> {
        let user = user.into_user();
        if self
            .email_index
            .pin()
            .try_insert(user.email.clone(), user.id)
            .is_err()
        {
            return Err(StorageError::already_exists(USERS, user.email));
        }
        self.users.pin().insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_by_role(&self, role: Role) -> StorageResult<Vec<User>> {
        let users = self.users.pin();
        Ok(sorted_by_creation(
            users.values().filter(|u| u.role == role).cloned(),
            |u| (u.created_at.unix_timestamp_nanos(), u.id),
        ))
    }

    async fn find_doctors_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        department: &str,
    ) -> StorageResult<Vec<User>> {
        let users = self.users.pin();
        Ok(sorted_by_creation(
            users
                .values()
                .filter(|u| {
                    u.role == Role::Doctor
                        && u.first_name == first_name
                        && u.last_name == last_name
                        && u.doctor_department.as_deref() == Some(department)
                })
                .cloned(),
            |u| (u.created_at.unix_timestamp_nanos(), u.id),
        ))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let removed = self
            .users
            .pin()
            .remove(&id)
            .cloned()
            .ok_or_else(|| StorageError::not_found(USERS, id.to_string()))?;
        self.email_index.pin().remove(&removed.email);
        Ok(())
    }
}

#[async_trait]
impl MessageStorage for InMemoryStorage {
    async fn create(&self, message: NewMessage) -> StorageResult<Message> {
        let message = message.into_message();
        self.messages.pin().insert(message.id, message.clone());
        Ok(message)
    }

    async fn list(&self) -> StorageResult<Vec<Message>> {
        let messages = self.messages.pin();
        Ok(sorted_by_creation(messages.values().cloned(), |m| {
            (m.created_at.unix_timestamp_nanos(), m.id)
        }))
    }
}

#[async_trait]
impl AppointmentStorage for InMemoryStorage {
    async fn create(&self, appointment: NewAppointment) -> StorageResult<Appointment> {
        let appointment = appointment.into_appointment();
        self.appointments
            .pin()
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn list(&self) -> StorageResult<Vec<Appointment>> {
        let appointments = self.appointments.pin();
        Ok(sorted_by_creation(appointments.values().cloned(), |a| {
            (a.created_at.unix_timestamp_nanos(), a.id)
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Appointment>> {
        Ok(self.appointments.pin().get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> StorageResult<Appointment> {
        self.appointments
            .pin()
            .update(id, |existing| Appointment {
                status,
                ..existing.clone()
            })
            .cloned()
            .ok_or_else(|| StorageError::not_found(APPOINTMENTS, id.to_string()))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.appointments
            .pin()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(APPOINTMENTS, id.to_string()))
    }
}
