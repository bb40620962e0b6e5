//! Diesel schema for the tracker tables.

diesel::table! {
    /// Accounts known to the tracker.
    users (id) {
        /// Internal user identifier.
        id -> Int8,
        /// Login e-mail address.
        #[max_length = 256]
        email -> Varchar,
        /// Name shown on tickets and comments.
        #[max_length = 180]
        display_name -> Varchar,
        /// Optional avatar image location.
        #[max_length = 200]
        avatar_url -> Nullable<Varchar>,
        /// Whether the user holds the administrator role.
        is_admin -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects with their unique upper-case keys.
    projects (id) {
        /// Internal project identifier.
        id -> Int8,
        /// Unique upper-case project key.
        #[max_length = 130]
        key -> Varchar,
        /// Display name.
        #[max_length = 160]
        name -> Varchar,
        /// Optional description.
        #[max_length = 600]
        description -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project membership pairs.
    project_members (project_id, user_id) {
        /// Project the user belongs to.
        project_id -> Int8,
        /// Member user.
        user_id -> Int8,
    }
}

diesel::table! {
    /// Workflow statuses per project.
    project_statuses (id) {
        /// Internal status identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Display name, unique per project ignoring case.
        #[max_length = 120]
        name -> Varchar,
        /// Position in the workflow.
        sort_order -> Int4,
        /// Whether new tickets land in this status.
        is_default -> Bool,
    }
}

diesel::table! {
    /// Per-user Kanban column layout.
    kanban_column_preferences (id) {
        /// Internal preference identifier.
        id -> Int8,
        /// Project the board belongs to.
        project_id -> Int8,
        /// Owner of the layout.
        user_id -> Int8,
        /// Status shown by the column.
        status_id -> Int8,
        /// Left-to-right position.
        position -> Int4,
        /// Whether the column is shown.
        is_visible -> Bool,
    }
}

diesel::table! {
    /// Tickets bound to a project status.
    tickets (id) {
        /// Internal ticket identifier.
        id -> Int8,
        /// Owning project.
        project_id -> Int8,
        /// Per-project ticket number.
        sequence -> Int8,
        /// Unique ticket key such as `DEMO-1`.
        #[max_length = 150]
        key -> Varchar,
        /// Ticket title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional long description.
        description -> Nullable<Text>,
        /// Ticket type.
        #[max_length = 16]
        ticket_type -> Varchar,
        /// Ticket priority.
        #[max_length = 16]
        priority -> Varchar,
        /// Current workflow status.
        status_id -> Int8,
        /// User who reported the ticket.
        reporter_id -> Int8,
        /// Optional assignee.
        assignee_id -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Comments on tickets.
    ticket_comments (id) {
        /// Internal comment identifier.
        id -> Int8,
        /// Ticket the comment belongs to.
        ticket_id -> Int8,
        /// Author of the comment.
        author_id -> Int8,
        /// Comment text.
        #[max_length = 800]
        body -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(project_members -> projects (project_id));
diesel::joinable!(project_members -> users (user_id));
diesel::joinable!(project_statuses -> projects (project_id));
diesel::joinable!(kanban_column_preferences -> project_statuses (status_id));
diesel::joinable!(tickets -> projects (project_id));
diesel::joinable!(tickets -> project_statuses (status_id));
diesel::joinable!(ticket_comments -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    projects,
    project_members,
    project_statuses,
    kanban_column_preferences,
    tickets,
    ticket_comments,
);
