mod page_flow;
mod shape_removal;
mod task_lifecycle;
