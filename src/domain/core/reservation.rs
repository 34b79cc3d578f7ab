use chrono::{DateTime, SubsecRound, Utc};
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{Aggregation, Entity, Event, EventQueue, EventQueueIntoIter, Id};

use super::{Money, RoomType, RoomTypeError, StayDate, StayDateError};

/// 予約ID
///
/// `Default` は nil UUID で、まだ作成されていない予約を表す。
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// ランダムな予約IDを発行する
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Id for ReservationId {
    type Inner = Uuid;
}

/// 宿泊客ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Deref, Default,
)]
pub struct GuestId(i64);

impl Id for GuestId {
    type Inner = i64;
}

/// 予約イベント
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationEvent {
    /// 予約が作成された
    ReservationCreated {
        id: ReservationId,
        reservation_date: DateTime<Utc>,
        guest_id: GuestId,
        room_type: RoomType,
        start_date: StayDate,
        end_date: StayDate,
    },
    /// 宿泊客が変更された
    GuestChanged { id: ReservationId, guest_id: GuestId },
    /// 部屋の種類が変更された
    RoomChanged {
        id: ReservationId,
        room_type: RoomType,
    },
    /// チェックイン日が変更された
    StartDateChanged { id: ReservationId, date: StayDate },
    /// チェックアウト日が変更された
    EndDateChanged { id: ReservationId, date: StayDate },
}

impl Event for ReservationEvent {
    type Id = ReservationId;
}

/// 予約エンティティ
///
/// 内部で同期はしない。複数スレッドから変更する場合は呼び出し側で排他すること。
/// IDと作成日時を割り当てるのは `create`（またはその作成イベントの適用）だけで、
/// `Reservation::default()` は nil ID を持つ未作成の予約になる。
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Reservation {
    id: ReservationId,
    reservation_date: DateTime<Utc>,
    guest_id: GuestId,
    room_type: RoomType,
    start_date: StayDate,
    end_date: StayDate,
    #[serde(skip)]
    events: EventQueue<ReservationEvent>,
}

impl Reservation {
    pub fn create(
        guest_id: GuestId,
        room_type: RoomType,
        start_date: &str,
        end_date: &str,
    ) -> Result<Self, ReservationError> {
        let start_date = start_date.parse::<StayDate>()?;
        let end_date = end_date.parse::<StayDate>()?;
        let mut entity = Reservation::default();
        let event = ReservationEvent::ReservationCreated {
            id: ReservationId::generate(),
            // millisecond resolution
            reservation_date: Utc::now().trunc_subsecs(3),
            guest_id,
            room_type,
            start_date,
            end_date,
        };
        entity.validate(&event)?;
        entity.apply(event);
        debug!(
            reservation_id = %entity.id,
            guest_id = %entity.guest_id,
            room_type = %entity.room_type,
            "予約を作成しました"
        );
        Ok(entity)
    }

    pub fn change_guest(&mut self, guest_id: GuestId) {
        self.apply(ReservationEvent::GuestChanged {
            id: self.id,
            guest_id,
        });
    }

    /// 部屋の種類を変更する（料金表との照合は請求額の計算時に行う）
    pub fn change_room(&mut self, room_type: RoomType) {
        self.apply(ReservationEvent::RoomChanged {
            id: self.id,
            room_type,
        });
    }

    pub fn change_start_date(&mut self, date: &str) -> Result<(), ReservationError> {
        let event = ReservationEvent::StartDateChanged {
            id: self.id,
            date: date.parse()?,
        };
        self.validate(&event)?;
        self.apply(event);
        Ok(())
    }

    pub fn change_end_date(&mut self, date: &str) -> Result<(), ReservationError> {
        let event = ReservationEvent::EndDateChanged {
            id: self.id,
            date: date.parse()?,
        };
        self.validate(&event)?;
        self.apply(event);
        Ok(())
    }

    /// 作成済みか（IDが割り当てられているか）
    pub fn is_created(&self) -> bool {
        self.id != ReservationId::default()
    }

    /// 予約を作成した日時
    pub fn reservation_date(&self) -> DateTime<Utc> {
        self.reservation_date
    }

    pub fn guest_id(&self) -> GuestId {
        self.guest_id
    }

    pub fn room_type(&self) -> &RoomType {
        &self.room_type
    }

    pub fn start_date(&self) -> StayDate {
        self.start_date
    }

    pub fn end_date(&self) -> StayDate {
        self.end_date
    }

    /// 宿泊日数（チェックアウト日がチェックイン日より前なら負）
    pub fn number_of_days(&self) -> i64 {
        self.start_date.days_until(&self.end_date)
    }

    /// 請求額 = 一泊の料金 × 宿泊日数
    pub fn bill_amount(&self) -> Result<Money, ReservationError> {
        let nightly = self.room_type.nightly_price().map_err(|e| {
            warn!(reservation_id = %self.id, "料金表にない部屋の種類です: {}", e);
            e
        })?;
        let nights = self.number_of_days();
        let bill = nightly
            .times(nights)
            .ok_or(ReservationError::AmountOverflow)?;
        debug!(reservation_id = %self.id, nights, bill = %bill, "請求額を計算しました");
        Ok(bill)
    }

    fn validate_not_created(&self) -> Result<(), ReservationError> {
        if self.is_created() {
            return Err(ReservationError::AlreadyCreated);
        }
        Ok(())
    }

    fn validate_id(&self, id: &ReservationId) -> Result<(), ReservationError> {
        if self.id != *id {
            return Err(ReservationError::MismatchedId);
        }
        Ok(())
    }
}

impl Entity for Reservation {
    type Id = ReservationId;

    const ENTITY_NAME: &'static str = "reservation";

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Aggregation for Reservation {
    type Event = ReservationEvent;
    type Error = ReservationError;

    fn validate(&self, event: &Self::Event) -> Result<(), Self::Error> {
        match event {
            ReservationEvent::ReservationCreated { .. } => self.validate_not_created(),
            ReservationEvent::GuestChanged { id, .. }
            | ReservationEvent::RoomChanged { id, .. }
            | ReservationEvent::StartDateChanged { id, .. }
            | ReservationEvent::EndDateChanged { id, .. } => self.validate_id(id),
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match &event {
            ReservationEvent::ReservationCreated {
                id,
                reservation_date,
                guest_id,
                room_type,
                start_date,
                end_date,
            } => {
                if self.is_created() {
                    return;
                }
                self.id = *id;
                self.reservation_date = *reservation_date;
                self.guest_id = *guest_id;
                self.room_type = room_type.clone();
                self.start_date = *start_date;
                self.end_date = *end_date;
            }
            ReservationEvent::GuestChanged { id, guest_id } => {
                if self.id != *id {
                    return;
                }
                self.guest_id = *guest_id;
            }
            ReservationEvent::RoomChanged { id, room_type } => {
                if self.id != *id {
                    return;
                }
                self.room_type = room_type.clone();
            }
            ReservationEvent::StartDateChanged { id, date } => {
                if self.id != *id {
                    return;
                }
                self.start_date = *date;
            }
            ReservationEvent::EndDateChanged { id, date } => {
                if self.id != *id {
                    return;
                }
                self.end_date = *date;
            }
        }
        self.events.push(event);
    }

    fn events(&self) -> &EventQueue<Self::Event> {
        &self.events
    }

    fn events_mut(&mut self) -> &mut EventQueue<Self::Event> {
        &mut self.events
    }
}

impl IntoIterator for Reservation {
    type Item = ReservationEvent;
    type IntoIter = EventQueueIntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl PartialEq for Reservation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.reservation_date == other.reservation_date
            && self.guest_id == other.guest_id
            && self.room_type == other.room_type
            && self.start_date == other.start_date
            && self.end_date == other.end_date
    }
}

impl Eq for Reservation {}

/// 予約エラー
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
pub enum ReservationError {
    /// IDが一致しません
    #[display(fmt = "ID does not match")]
    MismatchedId,
    /// 予約は作成済みです
    #[display(fmt = "Reservation is already created")]
    AlreadyCreated,
    /// 日付の書式が不正です
    #[display(fmt = "Invalid reservation date: {}", _0)]
    MalformedDate(#[error(source)] StayDateError),
    /// 料金表にない部屋の種類です
    #[display(fmt = "Cannot price reservation: {}", _0)]
    UnknownRoomType(#[error(source)] RoomTypeError),
    /// 請求額が桁あふれしました
    #[display(fmt = "Bill amount overflowed")]
    AmountOverflow,
}

impl From<StayDateError> for ReservationError {
    fn from(value: StayDateError) -> Self {
        Self::MalformedDate(value)
    }
}

impl From<RoomTypeError> for ReservationError {
    fn from(value: RoomTypeError) -> Self {
        Self::UnknownRoomType(value)
    }
}
