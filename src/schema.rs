table! {
    users (id) {
        id -> Text,
        email -> Text,
        password -> Text,
        name -> Text,
        role -> Text,
        created_at -> Timestamp,
    }
}

table! {
    availabilities (id) {
        id -> Text,
        professor_id -> Text,
        start_time -> Timestamp,
        end_time -> Timestamp,
        is_booked -> Bool,
        created_at -> Timestamp,
    }
}

table! {
    appointments (id) {
        id -> Text,
        slot_id -> Text,
        student_id -> Text,
        professor_id -> Text,
        status -> Text,
        created_at -> Timestamp,
    }
}

allow_tables_to_appear_in_same_query!(appointments, availabilities, users,);
